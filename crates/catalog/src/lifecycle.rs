//! Borrow/return transitions: `Available ⇄ Borrowed`.

use crate::record::Record;
use stacks_common::{CatalogError, Status};

/// Check out an available record at `now` (Unix seconds).
///
/// On success the record becomes `Borrowed`, `last_borrowed = now` and the
/// borrow count goes up by one. A borrowed record is left untouched.
pub fn borrow(record: &mut Record, now: u64) -> Result<(), CatalogError> {
    if record.status != Status::Available {
        return Err(CatalogError::InvalidTransition {
            title: record.title.clone(),
            status: record.status,
        });
    }
    record.status = Status::Borrowed;
    record.last_borrowed = now;
    record.borrow_count = record.borrow_count.saturating_add(1);
    Ok(())
}

/// Check a borrowed record back in.
pub fn return_item(record: &mut Record) -> Result<(), CatalogError> {
    if record.status != Status::Borrowed {
        return Err(CatalogError::InvalidTransition {
            title: record.title.clone(),
            status: record.status,
        });
    }
    record.status = Status::Available;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(count: u64) -> Record {
        Record::new("Dune".into(), "Frank Herbert".into(), vec!["SF".into()], count)
    }

    #[test]
    fn test_borrow_then_return_roundtrip() {
        let mut r = book(7);
        borrow(&mut r, 1_700_000_000).unwrap();
        assert_eq!(r.status, Status::Borrowed);
        assert_eq!(r.last_borrowed, 1_700_000_000);
        assert_eq!(r.borrow_count, 8);

        return_item(&mut r).unwrap();
        assert_eq!(r.status, Status::Available);
        assert_eq!(r.borrow_count, 8);
        assert_eq!(r.last_borrowed, 1_700_000_000);
    }

    #[test]
    fn test_double_borrow_is_rejected_without_change() {
        let mut r = book(0);
        borrow(&mut r, 100).unwrap();
        let before = r.clone();

        let err = borrow(&mut r, 200).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidTransition {
                status: Status::Borrowed,
                ..
            }
        ));
        assert_eq!(r, before);
    }

    #[test]
    fn test_return_of_available_is_rejected() {
        let mut r = book(3);
        let err = return_item(&mut r).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidTransition {
                status: Status::Available,
                ..
            }
        ));
        assert_eq!(r.status, Status::Available);
        assert_eq!(r.borrow_count, 3);
    }

    #[test]
    fn test_repeated_cycles_count_each_borrow() {
        let mut r = book(0);
        for t in 1..=4 {
            borrow(&mut r, t).unwrap();
            return_item(&mut r).unwrap();
        }
        assert_eq!(r.borrow_count, 4);
        assert_eq!(r.last_borrowed, 4);
    }
}
