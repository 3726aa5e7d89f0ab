#[cfg(test)]
mod tests {
    use crate::{Value, ValueKind};

    #[test]
    fn test_number_round_trips_bits() {
        let v = Value::number(-2.25);
        assert!(v.is_number());
        assert_eq!(v.kind, ValueKind::Number);
        assert_eq!(v.payload, (-2.25f64).to_bits());
        assert_eq!(v.as_number(), Some(-2.25));
        assert_eq!(v.as_bool(), None);
    }

    #[test]
    fn test_bool_payload() {
        assert_eq!(Value::bool(true).payload, 1);
        assert_eq!(Value::bool(false).payload, 0);
        assert_eq!(Value::bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_default_is_nil() {
        assert!(Value::default().is_nil());
        assert_eq!(Value::default(), Value::nil());
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::nil().is_falsey());
        assert!(Value::bool(false).is_falsey());
        assert!(Value::bool(true).is_truthy());
        assert!(Value::number(0.0).is_truthy());
        assert!(Value::string(0).is_truthy());
        assert!(Value::function(3).is_truthy());
    }

    #[test]
    fn test_handles() {
        assert_eq!(Value::string(7).as_handle(), Some(7));
        assert_eq!(Value::function(2).as_handle(), Some(2));
        assert_eq!(Value::number(7.0).as_handle(), None);
    }

    #[test]
    fn test_loose_eq_requires_same_kind() {
        assert!(!Value::bool(false).loose_eq(&Value::nil()));
        assert!(!Value::number(1.0).loose_eq(&Value::bool(true)));
        assert!(!Value::string(1).loose_eq(&Value::function(1)));
    }

    #[test]
    fn test_loose_eq_numbers() {
        assert!(Value::number(3.0).loose_eq(&Value::number(3.0)));
        assert!(Value::number(0.0).loose_eq(&Value::number(-0.0)));
        assert!(!Value::number(1.0).loose_eq(&Value::number(2.0)));
        // Same bits, so NaN equals itself here.
        assert!(Value::number(f64::NAN).loose_eq(&Value::number(f64::NAN)));
    }

    #[test]
    fn test_loose_eq_handles() {
        assert!(Value::string(4).loose_eq(&Value::string(4)));
        assert!(!Value::string(4).loose_eq(&Value::string(5)));
        assert!(Value::nil().loose_eq(&Value::nil()));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Value::number(7.0)), "Number(7)");
        assert_eq!(format!("{:?}", Value::bool(false)), "Bool(0)");
        assert_eq!(format!("{:?}", Value::nil()), "Nil");
    }
}
