// Unit tests for user-dashboard
// These tests work with the public API without modifying the main codebase

#[cfg(test)]
mod search_tests {
    use user_dashboard::search::{
        FilterState, SortKey, StatusFilter, apply, apply_clamped, clamp_page, total_pages,
    };
    use user_dashboard::source::UserSummary;

    fn user(id: &str, name: &str, email: &str, status: &str) -> UserSummary {
        UserSummary {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
            status: status.into(),
            bio: None,
            joined_at: None,
            last_seen: None,
        }
    }

    fn sample() -> Vec<UserSummary> {
        vec![
            user("1", "Anna", "a@x.io", "Active"),
            user("2", "Bob", "annabob@x.io", "Inactive"),
            user("3", "Carl", "c@x.io", "Active"),
            user("4", "joanna", "j@x.io", "Active"),
            user("5", "Dora", "d@x.io", ""),
        ]
    }

    fn names(users: &[UserSummary]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_search_matches_name_or_email_case_insensitive() {
        let state = FilterState {
            search_text: "ANN".into(),
            ..FilterState::default()
        };
        let view = apply(&sample(), &state);
        assert_eq!(names(&view.filtered), vec!["Anna", "Bob", "joanna"]);
        for u in &view.filtered {
            let hay = format!("{} {}", u.name, u.email).to_lowercase();
            assert!(hay.contains("ann"));
        }
    }

    #[test]
    fn test_status_filter_is_exact() {
        let mut state = FilterState {
            status_filter: StatusFilter::Inactive,
            ..FilterState::default()
        };
        assert_eq!(names(&apply(&sample(), &state).filtered), vec!["Bob"]);
        state.status_filter = StatusFilter::Active;
        let view = apply(&sample(), &state);
        assert!(view.filtered.iter().all(|u| u.status == "Active"));
        assert_eq!(view.filtered.len(), 3);
    }

    #[test]
    fn test_engine_is_idempotent() {
        let state = FilterState {
            search_text: "a".into(),
            sort_key: SortKey::NameDesc,
            page_size: 5,
            ..FilterState::default()
        };
        let first = apply(&sample(), &state);
        let second = apply(&sample(), &state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_desc_is_reverse_of_asc_for_distinct_names() {
        let asc = apply(&sample(), &FilterState::default());
        let desc = apply(
            &sample(),
            &FilterState {
                sort_key: SortKey::NameDesc,
                ..FilterState::default()
            },
        );
        let mut reversed = names(&asc.filtered);
        reversed.reverse();
        assert_eq!(names(&desc.filtered), reversed);
        assert_eq!(names(&asc.filtered), vec!["Anna", "Bob", "Carl", "Dora", "joanna"]);
    }

    #[test]
    fn test_page_bounds_and_sizes() {
        let users: Vec<_> = (0..23)
            .map(|i| user(&i.to_string(), &format!("n{:02}", i), "e@x.io", "Active"))
            .collect();
        for size in [5, 10, 20] {
            let pages = total_pages(users.len(), size);
            for page in 1..=pages {
                let state = FilterState {
                    page_size: size,
                    current_page: page,
                    ..FilterState::default()
                };
                let view = apply(&users, &state);
                assert!(view.page.len() <= size);
                assert!(!view.page.is_empty());
                assert_eq!(view.total_pages, pages);
            }
        }
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_clamp_after_result_set_shrinks() {
        let mut users: Vec<_> = (0..7)
            .map(|i| user(&i.to_string(), &format!("a{i}"), "e@x.io", "Active"))
            .collect();
        users.extend((7..12).map(|i| user(&i.to_string(), &format!("i{i}"), "e@x.io", "Inactive")));
        let mut state = FilterState {
            page_size: 5,
            current_page: 3,
            ..FilterState::default()
        };
        assert_eq!(apply_clamped(&users, &mut state).page.len(), 2);

        state.status_filter = StatusFilter::Inactive;
        let view = apply_clamped(&users, &mut state);
        assert_eq!(view.total_pages, 1);
        assert_eq!(state.current_page, 1);
        assert_eq!(view.page.len(), 5);
    }

    #[test]
    fn test_clamp_page_stays_in_range() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_search_special_characters_and_no_panic() {
        let state = FilterState {
            search_text: "*[(.?\\".into(),
            ..FilterState::default()
        };
        let view = apply(&sample(), &state);
        assert!(view.filtered.is_empty());
        assert!(view.page.is_empty());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use std::error::Error as _;
    use user_dashboard::error::{Context, DetailError, FetchError};

    #[test]
    fn test_context_error_chaining() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
        let err = res.with_ctx(|| "write theme.conf".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "write theme.conf: disk full");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_detail_error_wraps_fetch_error() {
        let e: DetailError = FetchError::Transport("connection refused".into()).into();
        assert_eq!(e.to_string(), "Failed to fetch user data: connection refused");
    }
}

#[cfg(test)]
mod debounce_tests {
    use std::time::{Duration, Instant};
    use user_dashboard::app::debounce::{DebounceState, Debouncer, SEARCH_DEBOUNCE};

    #[test]
    fn test_only_last_value_within_window_commits() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(SEARCH_DEBOUNCE);
        d.input("a", t0);
        d.input("an", t0 + Duration::from_millis(100));
        d.input("ann", t0 + Duration::from_millis(200));
        assert_eq!(d.poll(t0 + Duration::from_millis(450)), None);
        assert_eq!(d.state(), DebounceState::Pending);
        assert_eq!(d.poll(t0 + Duration::from_millis(500)), Some("ann".to_string()));
        assert_eq!(d.state(), DebounceState::Idle);
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(SEARCH_DEBOUNCE);
        d.push_char('x', t0);
        d.cancel();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }
}

#[cfg(test)]
mod overlay_tests {
    use user_dashboard::app::loader::DetailState;
    use user_dashboard::error::DetailError;
    use user_dashboard::app::overlay::{Overlay, OverlayControl, Trigger, controls_for};

    #[test]
    fn test_focus_wraps_both_directions() {
        let controls = controls_for(&DetailState::Failed(DetailError::NotFound("7".into())));
        let mut overlay = Overlay::default();
        overlay.open("7", Trigger { user_id: "7".into() });
        assert_eq!(overlay.focused(controls), Some(OverlayControl::Close));
        overlay.focus_prev(controls);
        assert_eq!(overlay.focused(controls), Some(OverlayControl::ErrorClose));
        overlay.focus_next(controls);
        assert_eq!(overlay.focused(controls), Some(OverlayControl::Close));
        overlay.focus_next(controls);
        overlay.focus_next(controls);
        assert_eq!(overlay.focused(controls), Some(OverlayControl::Close));
    }

    #[test]
    fn test_restore_happens_once() {
        let mut overlay = Overlay::default();
        overlay.open("3", Trigger { user_id: "3".into() });
        overlay.close();
        assert_eq!(overlay.take_restore().map(|t| t.user_id), Some("3".to_string()));
        assert!(overlay.take_restore().is_none());
    }
}

#[cfg(test)]
mod stats_tests {
    use user_dashboard::source::UserSummary;
    use user_dashboard::stats::{status_counts, tooltip};

    #[test]
    fn test_chart_tracks_filtered_set() {
        let users: Vec<UserSummary> = ["Active", "Active", "Inactive"]
            .iter()
            .enumerate()
            .map(|(i, s)| UserSummary {
                id: i.to_string(),
                name: format!("u{i}"),
                email: String::new(),
                avatar: None,
                status: s.to_string(),
                bio: None,
                joined_at: None,
                last_seen: None,
            })
            .collect();
        let buckets = status_counts(&users);
        assert_eq!(tooltip(&buckets[0], users.len()), "Active: 2 (66.7%)");
        assert_eq!(tooltip(&buckets[1], users.len()), "Inactive: 1 (33.3%)");

        let only_inactive: Vec<_> = users.into_iter().filter(|u| u.status == "Inactive").collect();
        let buckets = status_counts(&only_inactive);
        assert_eq!(buckets.len(), 1);
        assert_eq!(tooltip(&buckets[0], only_inactive.len()), "Inactive: 1 (100.0%)");
    }
}
