//! Property tests for path relativization.

use std::path::PathBuf;

use proptest::prelude::*;

use lookout::{Listener, ListenerConfig, PollingBackend};

fn polling_listener(config: &ListenerConfig) -> Listener {
    Listener::with_backend(config, Box::new(PollingBackend::default())).unwrap()
}

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_][A-Za-z0-9_.-]{0,10}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Paths under the root lose exactly the root prefix.
    #[test]
    fn property_relativize_strips_root(segments in proptest::collection::vec(segment(), 1..5)) {
        let dir = tempfile::tempdir().unwrap();
        let config = ListenerConfig::for_directory(dir.path()).with_dispatch(false);
        let listener = polling_listener(&config);

        let relative: PathBuf = segments.iter().collect();
        let absolute = listener.directory().join(&relative);
        let result = listener.relativize_paths(vec![absolute.clone()]);
        prop_assert_eq!(&result[0], &relative);
        prop_assert_eq!(listener.directory().join(&result[0]), absolute);
    }

    /// PROPERTY: With relativization off, paths come back untouched.
    #[test]
    fn property_absolute_mode_is_identity(segments in proptest::collection::vec(segment(), 1..5)) {
        let dir = tempfile::tempdir().unwrap();
        let config = ListenerConfig::for_directory(dir.path())
            .with_dispatch(false)
            .with_relativize_paths(false);
        let listener = polling_listener(&config);

        let absolute = listener.directory().join(segments.iter().collect::<PathBuf>());
        prop_assert_eq!(listener.relativize_paths(vec![absolute.clone()]), vec![absolute]);
    }
}
