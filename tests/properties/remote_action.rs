//! Property tests for mapping change events onto remote actions.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use fsync::domain::value_objects::{ChangeEvent, ChangeKind, EntryType, RemoteAction};

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,15}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..");
    proptest::collection::vec(segment, 1..=5)
}

fn kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Create),
        Just(ChangeKind::Write),
        Just(ChangeKind::Remove),
        Just(ChangeKind::Rename),
        Just(ChangeKind::Chmod),
    ]
}

fn entry() -> impl Strategy<Value = EntryType> {
    prop_oneof![
        Just(EntryType::File),
        Just(EntryType::Directory),
        Just(EntryType::Unknown),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Actions for paths under the local root land under the remote root.
    #[test]
    fn property_target_stays_under_remote_root(
        segments in relative_path(),
        kind in kind(),
        entry in entry(),
    ) {
        let root = Path::new("/home/dev/site");
        let path: PathBuf = segments.iter().fold(root.to_path_buf(), |p, s| p.join(s));
        let event = ChangeEvent::new(kind, &path).with_entry(entry);

        if let Some(action) = RemoteAction::plan(&event, root, "/srv/site") {
            let expected = format!("/srv/site/{}", segments.join("/"));
            prop_assert_eq!(action.target(), expected.as_str());
        } else {
            prop_assert_eq!((kind, entry), (ChangeKind::Write, EntryType::Directory));
        }
    }

    /// PROPERTY: Paths outside the local root never produce an action.
    #[test]
    fn property_outside_root_is_ignored(
        segments in relative_path(),
        kind in kind(),
        entry in entry(),
    ) {
        let path: PathBuf = segments.iter().fold(PathBuf::from("/elsewhere"), |p, s| p.join(s));
        let event = ChangeEvent::new(kind, &path).with_entry(entry);
        prop_assert_eq!(RemoteAction::plan(&event, Path::new("/home/dev/site"), "/srv"), None);
    }
}
