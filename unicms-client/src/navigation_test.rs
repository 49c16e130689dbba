//! Tests for locale-aware navigation

#[cfg(test)]
mod tests {
    use shared::{DEFAULT_LOCALE, Locale};

    use crate::navigation::{
        HistoryNavigator, LocalizedLink, LocalizedRouter, Navigator, resolve_current_locale,
    };

    const NO_LOCALE: Option<Locale> = None;

    #[test]
    fn test_resolution_prefers_path_then_ambient_then_default() {
        assert_eq!(
            resolve_current_locale(Some("/vi/dashboard"), &Some(Locale::En)),
            Locale::Vi
        );
        assert_eq!(
            resolve_current_locale(Some("/dashboard"), &Some(Locale::Zh)),
            Locale::Zh
        );
        assert_eq!(resolve_current_locale(None, &Locale::En), Locale::En);
        assert_eq!(resolve_current_locale(Some("/dashboard"), &NO_LOCALE), DEFAULT_LOCALE);
        assert_eq!(resolve_current_locale(Some("/english"), &NO_LOCALE), DEFAULT_LOCALE);
    }

    #[test]
    fn test_push_prefixes_with_current_locale() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/en/dashboard"), NO_LOCALE);

        router.push("/universities");

        assert_eq!(router.navigator().current(), "/en/universities");
    }

    #[test]
    fn test_push_keeps_existing_prefix() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/en/dashboard"), NO_LOCALE);

        router.push("/zh/contents");

        assert_eq!(router.navigator().current(), "/zh/contents");
    }

    #[test]
    fn test_replace_rewrites_current_entry() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/ja/login"), NO_LOCALE);

        router.replace("/dashboard");

        assert_eq!(router.navigator().entries(), ["/ja/dashboard"]);
    }

    #[test]
    fn test_ambient_locale_used_outside_localized_paths() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/"), Locale::Vi);

        router.push("/payments");

        assert_eq!(router.navigator().current(), "/vi/payments");
    }

    #[test]
    fn test_link_and_push_agree() {
        for (start, ambient) in [
            ("/en/dashboard", NO_LOCALE),
            ("/dashboard", Some(Locale::Zh)),
            ("/", NO_LOCALE),
        ] {
            let mut router = LocalizedRouter::new(HistoryNavigator::new(start), ambient);
            let link = router.link("/settings", "Settings");

            router.push("/settings");

            assert_eq!(link.href, router.navigator().current());
            assert_eq!(link.label, "Settings");
        }
    }

    #[test]
    fn test_link_without_router() {
        let link = LocalizedLink::new("/", "Home", Some("/en/dashboard"), &NO_LOCALE);
        assert_eq!(link.href, "/en");
    }

    #[test]
    fn test_switch_locale_keeps_page_and_refreshes() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/ja/universities/3"), NO_LOCALE);

        router.switch_locale(Locale::En);

        assert_eq!(router.navigator().current(), "/en/universities/3");
        assert_eq!(router.navigator().refreshes(), 1);
        assert_eq!(router.current_locale(), Locale::En);
    }

    #[test]
    fn test_switch_locale_from_root() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/"), NO_LOCALE);

        router.switch_locale(Locale::Zh);

        assert_eq!(router.navigator().current(), "/zh");
    }

    #[test]
    fn test_history_passthrough() {
        let mut router = LocalizedRouter::new(HistoryNavigator::new("/en"), NO_LOCALE);
        router.push("/a");
        router.push("/b");

        router.back();
        assert_eq!(router.navigator().current(), "/en/a");
        router.forward();
        assert_eq!(router.navigator().current(), "/en/b");
        router.forward();
        assert_eq!(router.navigator().current(), "/en/b");
        router.refresh();
        assert_eq!(router.navigator().refreshes(), 1);

        let history = router.into_inner();
        assert_eq!(history.entries(), ["/en", "/en/a", "/en/b"]);
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let mut history = HistoryNavigator::default();
        history.push("/en/a");
        history.push("/en/b");
        history.back();
        history.push("/en/c");

        assert_eq!(history.entries(), ["/", "/en/a", "/en/c"]);
        history.back();
        history.back();
        history.back();
        assert_eq!(history.current(), "/");
    }

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Navigator for Recorder {
        fn push(&mut self, href: &str) {
            self.calls.push(format!("push {href}"));
        }

        fn replace(&mut self, href: &str) {
            self.calls.push(format!("replace {href}"));
        }

        fn back(&mut self) {
            self.calls.push("back".into());
        }

        fn forward(&mut self) {
            self.calls.push("forward".into());
        }

        fn refresh(&mut self) {
            self.calls.push("refresh".into());
        }
    }

    #[test]
    fn test_navigator_without_pathname_uses_ambient() {
        let mut router = LocalizedRouter::new(Recorder::default(), Some(Locale::En));

        router.push("/dashboard");
        router.replace("/ja/login");
        router.back();
        router.switch_locale(Locale::Vi);

        assert_eq!(
            router.into_inner().calls,
            [
                "push /en/dashboard",
                "replace /ja/login",
                "back",
                "push /vi",
                "refresh",
            ]
        );
    }
}
