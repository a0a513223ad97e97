//! Collections and indexes of the notification log database.
//!
//! This is the whole schema. `services::db_init` walks it in order.

use crate::models::{CollectionSpec, Direction::{self, Asc, Desc}, IndexSpec};

pub const DEFAULT_DB_NAME: &str = "notification_log_db";

const fn idx(name: &'static str, keys: &'static [(&'static str, Direction)]) -> IndexSpec {
    IndexSpec { name, keys, unique: false }
}

const fn unique(name: &'static str, keys: &'static [(&'static str, Direction)]) -> IndexSpec {
    IndexSpec { name, keys, unique: true }
}

pub const PUSH_RECORDS: CollectionSpec = CollectionSpec {
    name: "push_records",
    indexes: &[
        unique("message_id_unique", &[("message_id", Asc)]),
        idx("push_time_desc", &[("push_time", Desc)]),
        idx("message_type_idx", &[("message_type", Asc)]),
        idx("target_idx", &[("target", Asc)]),
        idx("success_idx", &[("success", Asc)]),
        idx("sender_id_idx", &[("sender_id", Asc)]),
        idx("status_idx", &[("status", Asc)]),
    ],
};

// many log entries per message, so message_id is not unique here
pub const NOTIFICATION_LOGS: CollectionSpec = CollectionSpec {
    name: "notification_logs",
    indexes: &[
        idx("message_id_idx", &[("message_id", Asc)]),
        idx("timestamp_desc", &[("timestamp", Desc)]),
        idx("event_type_idx", &[("event_type", Asc)]),
        idx("user_id_idx", &[("user_id", Asc)]),
    ],
};

pub const ADMIN_USER_RECEIVE_RECORDS: CollectionSpec = CollectionSpec {
    name: "admin_user_receive_records",
    indexes: &[
        idx("message_id_idx", &[("message_id", Asc)]),
        idx("user_id_idx", &[("user_id", Asc)]),
        idx("created_at_desc", &[("created_at", Desc)]),
        // one receive record per (message, user)
        unique("message_user_unique", &[("message_id", Asc), ("user_id", Asc)]),
        idx("is_received_idx", &[("is_received", Asc)]),
        idx("is_read_idx", &[("is_read", Asc)]),
        idx("is_confirmed_idx", &[("is_confirmed", Asc)]),
        idx("delivery_status_idx", &[("delivery_status", Asc)]),
        idx("push_channel_idx", &[("push_channel", Asc)]),
        idx("username_idx", &[("username", Asc)]),
    ],
};

pub const ADMIN_USER_ONLINE_STATUS: CollectionSpec = CollectionSpec {
    name: "admin_user_online_status",
    indexes: &[
        unique("user_id_unique", &[("user_id", Asc)]),
        idx("is_online_idx", &[("is_online", Asc)]),
        idx("last_seen_desc", &[("last_seen", Desc)]),
        idx("username_idx", &[("username", Asc)]),
    ],
};

pub const COLLECTIONS: &[CollectionSpec] = &[
    PUSH_RECORDS,
    NOTIFICATION_LOGS,
    ADMIN_USER_RECEIVE_RECORDS,
    ADMIN_USER_ONLINE_STATUS,
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn four_collections_in_setup_order() {
        let names: Vec<&str> = COLLECTIONS.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "push_records",
                "notification_logs",
                "admin_user_receive_records",
                "admin_user_online_status",
            ]
        );
    }

    #[test]
    fn declared_index_counts() {
        let counts: Vec<usize> = COLLECTIONS.iter().map(|c| c.indexes.len()).collect();
        assert_eq!(counts, vec![7, 4, 10, 4]);
    }

    #[test]
    fn index_names_are_unique_per_collection() {
        for c in COLLECTIONS {
            let names: HashSet<&str> = c.indexes.iter().map(|i| i.name).collect();
            assert_eq!(names.len(), c.indexes.len(), "{}", c.name);
            assert!(!names.contains("_id_"));
        }
    }

    #[test]
    fn only_expected_indexes_are_unique() {
        let uniques: Vec<(&str, &str)> = COLLECTIONS
            .iter()
            .flat_map(|c| c.indexes.iter().filter(|i| i.unique).map(move |i| (c.name, i.name)))
            .collect();
        assert_eq!(
            uniques,
            vec![
                ("push_records", "message_id_unique"),
                ("admin_user_receive_records", "message_user_unique"),
                ("admin_user_online_status", "user_id_unique"),
            ]
        );
    }

    #[test]
    fn receive_records_compound_key() {
        let compound = ADMIN_USER_RECEIVE_RECORDS
            .indexes
            .iter()
            .find(|i| i.name == "message_user_unique")
            .unwrap();
        assert_eq!(compound.keys, &[("message_id", Asc), ("user_id", Asc)]);
    }

    #[test]
    fn descending_time_fields() {
        let desc: Vec<&str> = COLLECTIONS
            .iter()
            .flat_map(|c| c.indexes.iter())
            .flat_map(|i| i.keys.iter())
            .filter(|(_, d)| *d == Desc)
            .map(|(f, _)| *f)
            .collect();
        assert_eq!(desc, vec!["push_time", "timestamp", "created_at", "last_seen"]);
    }
}
