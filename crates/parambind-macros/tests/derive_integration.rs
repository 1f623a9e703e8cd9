//! Integration tests for `#[derive(Bindable)]`.
//!
//! These check that the generated impls describe fields the way the binder
//! expects and that decoded values land in the right struct fields.

use indexmap::IndexMap;
use parambind::{Bindable, Binder, Kind, ParameterSet, Value};

/// Field naming with a container rule and a per-field override.
#[derive(Bindable, Debug, Default, PartialEq)]
#[bind(rename_all = "camelCase")]
struct Contact {
    pub first_name: String,
    #[bind(rename = "EMail")]
    pub email: String,
    pub phone_numbers: Vec<String>,
    pin_code: String,
}

/// Generic containers bound through a type parameter.
#[derive(Bindable, Debug, Default, PartialEq)]
struct Page<T: Bindable> {
    pub items: Vec<T>,
    pub total: u32,
}

/// A field that never takes part in binding.
#[derive(Bindable, Debug, Default)]
struct Session {
    pub user: String,
    #[bind(skip)]
    pub token: Option<String>,
}

#[derive(Bindable, Debug, Default, PartialEq)]
struct Marker;

#[derive(Bindable, Debug, Default, PartialEq)]
struct Item {
    pub r#type: String,
}

#[test]
fn test_describe_lists_binding_names() {
    let desc = Contact::describe();
    assert_eq!(desc.kind(), Kind::Struct);

    let fields: Vec<(&str, bool)> = desc
        .fields()
        .unwrap()
        .iter()
        .map(|f| (f.name, f.exported))
        .collect();
    assert_eq!(
        fields,
        [
            ("firstName", true),
            ("EMail", true),
            ("phoneNumbers", true),
            ("pinCode", false),
        ]
    );
    assert_eq!(desc.field("phoneNumbers").unwrap().describe().kind(), Kind::Slice);
}

#[test]
fn test_bind_renamed_fields() {
    let params: ParameterSet = [
        ("c.firstName", "Ada"),
        ("c.EMail", "ada@example.com"),
        ("c.phoneNumbers[]", "555-0100"),
        ("c.phoneNumbers[]", "555-0101"),
        ("c.email", "ignored"),
        ("c.pinCode", "1234"),
    ]
    .into_iter()
    .collect();

    let contact: Contact = Binder::default().bind(&params, "c");
    assert_eq!(
        contact,
        Contact {
            first_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_numbers: vec!["555-0100".to_string(), "555-0101".to_string()],
            pin_code: String::new(),
        }
    );
}

#[test]
fn test_private_fields_never_encode() {
    let contact = Contact {
        first_name: "Ada".to_string(),
        pin_code: "1234".to_string(),
        ..Contact::default()
    };
    let out = Binder::default().unbind_to_map("c", &contact);
    assert_eq!(out["c.firstName"], "Ada");
    assert!(!out.contains_key("c.pinCode"));
}

#[test]
fn test_generic_struct() {
    let params: ParameterSet = [("page.items[1]", "7"), ("page.items[0]", "3"), ("page.total", "2")]
        .into_iter()
        .collect();
    let page: Page<u16> = Binder::default().bind(&params, "page");
    assert_eq!(
        page,
        Page {
            items: vec![3, 7],
            total: 2,
        }
    );

    let nested: Page<Page<u8>> = Binder::default().bind(
        &[("p.items[0].total", "5")].into_iter().collect(),
        "p",
    );
    assert_eq!(nested.items.len(), 1);
    assert_eq!(nested.items[0].total, 5);
}

#[test]
fn test_skipped_field_keeps_default() {
    let params: ParameterSet = [("s.user", "rob"), ("s.token", "secret")]
        .into_iter()
        .collect();
    let session: Session = Binder::default().bind(&params, "s");
    assert_eq!(session.user, "rob");
    assert!(session.token.is_none());
    assert!(Session::describe().field("token").is_none());

    let out: IndexMap<String, String> = Binder::default().unbind_to_map(
        "s",
        &Session {
            user: "rob".to_string(),
            token: Some("secret".to_string()),
        },
    );
    assert_eq!(out.len(), 1);
}

#[test]
fn test_unit_struct() {
    assert_eq!(Marker.to_value(), Value::Struct(Vec::new()));
    assert_eq!(Marker::from_value(Value::Int(1)), Marker);
    assert!(Marker::describe().fields().unwrap().is_empty());
}

#[test]
fn test_raw_identifier_field() {
    let params: ParameterSet = [("i.type", "widget")].into_iter().collect();
    let item: Item = Binder::default().bind(&params, "i");
    assert_eq!(item.r#type, "widget");
}

#[test]
fn test_wrong_shape_is_zero() {
    let page = Page::<u16>::from_value(Value::from("not a struct"));
    assert_eq!(page, Page::default());
}
