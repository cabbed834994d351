use super::*;

#[test]
fn tags_match_wire_values() {
    assert_eq!(InfoKind::Custom as u8, 0);
    assert_eq!(InfoKind::Function as u8, 1);
    assert_eq!(InfoKind::Alias as u8, 2);
    assert_eq!(InfoKind::Record as u8, 3);
    assert_eq!(InfoKind::Array as u8, 4);
    assert_eq!(InfoKind::List as u8, 5);
    assert_eq!(InfoKind::String as u8, 6);
    assert_eq!(InfoKind::Int as u8, 7);
    assert_eq!(InfoKind::Fixed as u8, 8);
    assert_eq!(InfoKind::Bool as u8, 9);
    assert_eq!(InfoKind::Blob as u8, 10);
    assert_eq!(InfoKind::ResourceName as u8, 11);
    assert_eq!(InfoKind::Char as u8, 12);
}

#[test]
fn from_u8_inverts_discriminant() {
    for v in 0..=18u8 {
        let kind = InfoKind::from_u8(v).unwrap();
        assert_eq!(kind as u8, v);
    }
    assert_eq!(InfoKind::from_u8(19), None);
}

#[test]
fn singleton_kinds_have_no_payload() {
    assert!(InfoKind::Int.is_singleton());
    assert!(InfoKind::AnyMatching.is_singleton());
    assert!(!InfoKind::List.is_singleton());
    assert!(!InfoKind::Custom.is_singleton());
    assert!(!InfoKind::LocalType.is_singleton());
}
