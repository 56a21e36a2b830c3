use super::value::*;

#[test]
fn int_construction_enforces_range() {
    assert!(HrmValue::int(0).is_ok());
    assert!(HrmValue::int(999).is_ok());
    assert!(HrmValue::int(-999).is_ok());
    assert_eq!(HrmValue::int(1000), Err(ValueError::Overflow));
    assert_eq!(HrmValue::int(-1000), Err(ValueError::Overflow));
}

#[test]
fn arithmetic_stays_in_range() {
    let a = HrmValue::int(500).unwrap();
    let b = HrmValue::int(600).unwrap();
    assert_eq!(a.checked_add(&b), Err(ValueError::Overflow));
    assert_eq!(a.checked_sub(&b).unwrap().raw(), -100);
}

#[test]
fn division_by_zero_is_reported() {
    let a = HrmValue::int(10).unwrap();
    let zero = HrmValue::int(0).unwrap();
    assert_eq!(a.checked_div(&zero), Err(ValueError::DivByZero));
    assert_eq!(a.checked_rem(&zero), Err(ValueError::ModByZero));
}

#[test]
fn chars_do_not_mix_with_ints() {
    let c = HrmValue::char('a');
    let n = HrmValue::int(1).unwrap();
    assert_eq!(c.checked_add(&n), Err(ValueError::TypeMismatch));
    assert_eq!(c.compare(&n, |a, b| a < b), Err(ValueError::TypeMismatch));
}

#[test]
fn char_difference_is_an_int() {
    let a = HrmValue::char('a');
    let b = HrmValue::char('b');
    let diff = b.checked_sub(&a).unwrap();
    assert!(diff.is_int());
    assert_eq!(diff.raw(), 1);
}

#[test]
fn increment_keeps_char_flag() {
    let c = HrmValue::char('a').increment().unwrap();
    assert!(c.is_char());
    assert_eq!(c.raw(), 'b' as i32);

    let n = HrmValue::int(999).unwrap();
    assert_eq!(n.increment(), Err(ValueError::Overflow));
}

#[test]
fn truthiness_and_bool_words() {
    assert!(HrmValue::int(-1).unwrap().is_truthy());
    assert!(!HrmValue::int(0).unwrap().is_truthy());
    assert_eq!(HrmValue::bool(true).raw(), 1);
    assert_eq!(HrmValue::bool(false).raw(), 0);
}

#[test]
fn display_formats() {
    assert_eq!(HrmValue::int(42).unwrap().to_string(), "42");
    assert_eq!(HrmValue::char('x').to_string(), "'x'");
}
