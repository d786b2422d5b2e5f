use hr_core::{validate_department, FieldErrorKind, NewDepartment};
use serde_json::json;

#[test]
fn missing_name_is_rejected() {
    let err = validate_department(&json!({})).unwrap_err();
    assert_eq!(err.get("name"), Some(&FieldErrorKind::Required));
}

#[test]
fn non_string_name_is_rejected() {
    for name in [json!({}), json!([]), json!(42)] {
        let err = validate_department(&json!({ "name": name })).unwrap_err();
        assert!(
            matches!(err.get("name"), Some(FieldErrorKind::NotString { .. })),
            "unexpected error for {name}: {err}"
        );
    }
}

#[test]
fn name_outside_length_bounds_is_rejected() {
    for name in ["Dep", "VeryLongDeparmentName"] {
        let err = validate_department(&json!({ "name": name })).unwrap_err();
        assert!(
            matches!(err.get("name"), Some(FieldErrorKind::Length { .. })),
            "expected length error for {name}"
        );
    }
}

#[test]
fn name_within_bounds_is_accepted() {
    for name in ["Department", "Department Name Test", "Sales"] {
        validate_department(&json!({ "name": name })).unwrap();
    }
}

#[test]
fn typed_input_uses_same_rules() {
    assert!(NewDepartment::new("Dep").validate().is_err());
    assert!(NewDepartment::new("").validate().is_err());
    NewDepartment::new("Department Name Test").validate().unwrap();
}

#[test]
fn non_object_candidate_reports_missing_name() {
    let err = validate_department(&json!(["Marketing"])).unwrap_err();
    assert_eq!(err.get("name"), Some(&FieldErrorKind::Required));
}
