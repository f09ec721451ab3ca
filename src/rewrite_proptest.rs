//! Property-based tests for content rewriting.
//!
//! Entries are generated from small alphabets so that official and
//! non-official hosts, partial component sets and near-miss component names
//! all show up often.

#[cfg(test)]
mod proptest_tests {
    use crate::config::EngineConfig;
    use crate::rewrite::rewrite_content;
    use proptest::prelude::*;

    const REQUIRED: [&str; 3] = ["contrib", "non-free", "non-free-firmware"];

    fn official_host() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("deb.debian.org"),
            Just("security.debian.org"),
            Just("ftp.debian.org"),
        ]
    }

    fn other_host() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("archive.ubuntu.com"),
            Just("packages.example.com"),
            Just("mirror.local"),
        ]
    }

    fn components() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(
            prop_oneof![
                Just("main"),
                Just("contrib"),
                Just("non-free"),
                Just("non-free-firmware"),
                Just("non-freeware"),
                Just("updates"),
            ],
            1..5,
        )
    }

    fn entry(host: impl Strategy<Value = &'static str>) -> impl Strategy<Value = String> {
        (
            prop_oneof![Just("deb"), Just("deb-src")],
            prop::option::of(Just("[arch=amd64] ")),
            host,
            "[a-z]{3,10}",
            components(),
        )
            .prop_map(|(kind, options, host, suite, comps)| {
                format!(
                    "{} {}http://{}/debian {} {}",
                    kind,
                    options.unwrap_or(""),
                    host,
                    suite,
                    comps.join(" ")
                )
            })
    }

    fn stanza() -> impl Strategy<Value = String> {
        (
            prop_oneof![official_host(), other_host()],
            "[a-z]{3,10}",
            components(),
        )
            .prop_map(|(host, suite, comps)| {
                format!(
                    "Types: deb deb-src\nURIs: http://{}/debian\nSuites: {}\nComponents: {}\n",
                    host,
                    suite,
                    comps.join(" ")
                )
            })
    }

    fn rewrite(content: &str) -> String {
        rewrite_content(content, &EngineConfig::default())
            .unwrap()
            .content
    }

    proptest! {
        /// Property: a second rewrite never changes anything
        #[test]
        fn one_line_rewrite_is_idempotent(
            lines in prop::collection::vec(
                prop_oneof![entry(official_host()), entry(other_host())],
                0..6,
            )
        ) {
            let content = lines.join("\n") + "\n";
            let once = rewrite(&content);
            let second = rewrite_content(&once, &EngineConfig::default()).unwrap();
            prop_assert!(!second.is_changed());
            prop_assert_eq!(second.content, once);
        }

        /// Property: official entries end up with every required component
        /// appended exactly once, after the original tokens
        #[test]
        fn official_entry_gains_missing_tokens(line in entry(official_host())) {
            let output = rewrite(&line);
            let before: Vec<&str> = line.split_whitespace().collect();
            let after: Vec<&str> = output.split_whitespace().collect();

            prop_assert_eq!(&after[..before.len()], &before[..]);
            let appended = &after[before.len()..];
            for name in REQUIRED {
                let present = before.contains(&name);
                let added = appended.iter().filter(|t| **t == name).count();
                prop_assert_eq!(added, usize::from(!present), "component {}", name);
            }
        }

        /// Property: entries for other hosts are never touched
        #[test]
        fn non_official_entry_unchanged(line in entry(other_host())) {
            let content = format!("{}\n", line);
            prop_assert_eq!(rewrite(&content), content);
        }

        /// Property: commented-out entries are never touched
        #[test]
        fn commented_entry_unchanged(line in entry(official_host()), hashes in "#{1,3} ?") {
            let content = format!("{}{}\n", hashes, line);
            prop_assert_eq!(rewrite(&content), content);
        }

        /// Property: deb822 rewriting is idempotent and keeps stanza count
        #[test]
        fn deb822_rewrite_is_idempotent(stanzas in prop::collection::vec(stanza(), 1..4)) {
            let content = stanzas.join("\n");
            let once = rewrite(&content);
            prop_assert_eq!(rewrite(&once), once.clone());
            prop_assert_eq!(
                once.matches("Types:").count(),
                content.matches("Types:").count()
            );
        }

        /// Property: line endings and line count are preserved
        #[test]
        fn line_structure_preserved(
            lines in prop::collection::vec(entry(official_host()), 1..5),
            crlf in any::<bool>(),
        ) {
            let eol = if crlf { "\r\n" } else { "\n" };
            let content: String = lines.iter().map(|l| format!("{}{}", l, eol)).collect();
            let output = rewrite(&content);
            prop_assert_eq!(output.lines().count(), content.lines().count());
            prop_assert_eq!(output.matches(eol).count(), content.matches(eol).count());
        }
    }
}
