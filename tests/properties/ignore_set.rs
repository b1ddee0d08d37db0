//! Property tests for ignore-set membership.

use std::ffi::OsStr;
use std::path::PathBuf;

use proptest::prelude::*;

use lookout::{IgnoreSet, DEFAULT_IGNORE_PATHS};

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z_][a-z0-9_]{0,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Defaults are always present, whatever extras are added.
    #[test]
    fn property_defaults_survive_extras(extra in proptest::collection::vec(name(), 0..8)) {
        let set = IgnoreSet::with_defaults(extra.clone());
        for default in DEFAULT_IGNORE_PATHS {
            prop_assert!(set.contains(OsStr::new(default)));
        }
        for name in &extra {
            prop_assert!(set.contains(OsStr::new(name)));
        }
    }

    /// PROPERTY: A trailing slash never changes which name is ignored.
    #[test]
    fn property_trailing_slash_is_trimmed(name in name()) {
        let set = IgnoreSet::new([format!("{name}/")]);
        prop_assert!(set.contains(OsStr::new(&name)));
    }

    /// PROPERTY: Any path with an ignored component is ignored.
    #[test]
    fn property_ignored_component_anywhere(
        before in proptest::collection::vec(name(), 0..4),
        after in proptest::collection::vec(name(), 0..4),
    ) {
        let set = IgnoreSet::with_defaults(Vec::<String>::new());
        let mut path = PathBuf::new();
        path.extend(&before);
        path.push("tmp");
        path.extend(&after);
        prop_assert!(set.ignores_any_component(&path));
    }
}
