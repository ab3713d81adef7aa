use std::collections::HashSet;

use super::*;

#[test]
fn test_equal_name_and_kind_are_the_same_destination() {
    assert_eq!(Destination::queue("orders"), Destination::queue("orders"));
    assert_ne!(Destination::queue("orders"), Destination::topic("orders"));

    let mut set = HashSet::new();
    set.insert(Destination::queue("orders"));
    assert!(set.contains(&Destination::queue("orders")));
}

#[test]
fn test_temporary_flag_is_part_of_identity() {
    let temp = Destination::temporary("orders", DestinationKind::Queue);
    assert!(temp.is_temporary());
    assert!(temp.is_queue());
    assert_ne!(temp, Destination::queue("orders"));
}

#[test]
fn test_display_names_kind_and_name() {
    assert_eq!(Destination::topic("chat").to_string(), "topic://chat");
    assert_eq!(
        Destination::temporary("t1", DestinationKind::Queue).to_string(),
        "temporary queue://t1"
    );
}
