#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{category_slug, generate_slug, unique_slug, validate_slug};

        #[test]
        fn test_generate_slug_basic() {
            assert_eq!(generate_slug("Hello World"), "hello-world");
        }

        #[test]
        fn test_generate_slug_special_characters() {
            assert_eq!(generate_slug("Hello, World!"), "hello-world");
        }

        #[test]
        fn test_generate_slug_unicode() {
            assert_eq!(generate_slug("Café au lait"), "cafe-au-lait");
        }

        #[test]
        fn test_generate_slug_is_deterministic() {
            let title = "  Ten Things I Learned About Rust  ";
            let first = generate_slug(title);
            assert_eq!(first, generate_slug(title));
            assert_eq!(first, generate_slug(&first));
            assert!(validate_slug(&first));
        }

        #[test]
        fn test_generate_slug_truncates_long_titles() {
            let title = "word ".repeat(100);
            let slug = generate_slug(&title);
            assert!(slug.len() <= 200);
            assert!(!slug.ends_with('-'));
            assert!(validate_slug(&slug));
        }

        #[test]
        fn test_category_slug_rule() {
            assert_eq!(category_slug("Web Development"), "web-development");
            assert_eq!(category_slug("C++ & Rust!"), "c-rust");
            assert_eq!(category_slug("  Design  "), "design");
            assert_eq!(category_slug("Multiple   Spaces"), "multiple-spaces");
            assert_eq!(category_slug("snake_case"), "snake_case");
        }

        #[test]
        fn test_category_slug_only_symbols() {
            assert_eq!(category_slug("!!!"), "");
        }

        #[test]
        fn test_validate_slug_invalid() {
            assert!(!validate_slug(""));
            assert!(!validate_slug("Hello-World"));
            assert!(!validate_slug("hello world"));
            assert!(!validate_slug(&"a".repeat(201)));
        }

        #[test]
        fn test_unique_slug_free_base() {
            let slug = unique_slug("hello", |_| Ok(false)).unwrap();
            assert_eq!(slug, "hello");
        }

        #[test]
        fn test_unique_slug_appends_suffix() {
            let taken = ["hello", "hello-2"];
            let slug = unique_slug("hello", |s| Ok(taken.contains(&s))).unwrap();
            assert_eq!(slug, "hello-3");
        }

        #[test]
        fn test_unique_slug_gives_up() {
            assert!(unique_slug("hello", |_| Ok(true)).is_err());
        }
    }

    mod tag_tests {
        use crate::models::{BlogPost, CategoryColor, TagsInput};
        use crate::services::tags::{normalize_tags, tag_counts};

        fn post_with_tags(id: &str, tags: &[&str]) -> BlogPost {
            BlogPost {
                id: id.to_string(),
                slug: id.to_string(),
                title: id.to_string(),
                excerpt: String::new(),
                content: String::new(),
                cover_image: None,
                category: "General".to_string(),
                category_slug: "general".to_string(),
                category_color: CategoryColor::Blue,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                published: true,
                featured: false,
                reading_time: 1,
                author: None,
                created_at: "2024-01-01T00:00:00.000Z".to_string(),
                updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            }
        }

        #[test]
        fn test_comma_string_and_list_normalize_the_same() {
            let from_text = normalize_tags(&TagsInput::from(" rust, web ,, rust "));
            let from_list = normalize_tags(&TagsInput::from(vec![
                "rust".to_string(),
                " web".to_string(),
                "".to_string(),
            ]));
            assert_eq!(from_text, vec!["rust", "web"]);
            assert_eq!(from_text, from_list);
        }

        #[test]
        fn test_empty_input() {
            assert!(normalize_tags(&TagsInput::Empty).is_empty());
            assert!(normalize_tags(&TagsInput::from("")).is_empty());
            assert!(normalize_tags(&TagsInput::from(" , ,")).is_empty());
        }

        #[test]
        fn test_duplicates_are_case_insensitive_first_wins() {
            let tags = normalize_tags(&TagsInput::from("Rust, rust, RUST, Web"));
            assert_eq!(tags, vec!["Rust", "Web"]);
        }

        #[test]
        fn test_long_tags_are_truncated() {
            let long = "x".repeat(80);
            let tags = normalize_tags(&TagsInput::from(long.as_str()));
            assert_eq!(tags[0].chars().count(), 50);
        }

        #[test]
        fn test_tags_deserialize_from_every_shape() {
            #[derive(serde::Deserialize)]
            struct Body {
                #[serde(default)]
                tags: TagsInput,
            }

            let text: Body = serde_json::from_str(r#"{"tags": "a, b"}"#).unwrap();
            let list: Body = serde_json::from_str(r#"{"tags": ["a", null, "b"]}"#).unwrap();
            let null: Body = serde_json::from_str(r#"{"tags": null}"#).unwrap();
            let missing: Body = serde_json::from_str(r#"{}"#).unwrap();

            assert_eq!(normalize_tags(&text.tags), vec!["a", "b"]);
            assert_eq!(normalize_tags(&list.tags), vec!["a", "b"]);
            assert_eq!(null.tags, TagsInput::Empty);
            assert_eq!(missing.tags, TagsInput::Empty);
        }

        #[test]
        fn test_tag_counts_sorted_by_count_then_name() {
            let posts = vec![
                post_with_tags("a", &["rust", "web"]),
                post_with_tags("b", &["Rust", "design"]),
                post_with_tags("c", &["web", "rust"]),
            ];
            let counts = tag_counts(&posts);
            let pairs: Vec<(&str, usize)> =
                counts.iter().map(|t| (t.name.as_str(), t.count)).collect();
            assert_eq!(pairs, vec![("rust", 3), ("web", 2), ("design", 1)]);
        }
    }

    mod palette_tests {
        use crate::models::CategoryColor;

        #[test]
        fn test_default_color_is_blue() {
            assert_eq!(CategoryColor::default(), CategoryColor::Blue);
        }

        #[test]
        fn test_palette_round_trips_through_str() {
            for color in CategoryColor::PALETTE {
                assert_eq!(color.as_str().parse::<CategoryColor>(), Ok(color));
            }
        }

        #[test]
        fn test_unknown_color_rejected() {
            assert!("magenta".parse::<CategoryColor>().is_err());
        }
    }

    mod html_tests {
        use crate::services::html::{generate_excerpt, plain_text, reading_time, sanitize};

        #[test]
        fn test_sanitize_strips_scripts() {
            let html = sanitize("<p>Hello</p><script>alert(1)</script>");
            assert!(html.contains("<p>Hello</p>"));
            assert!(!html.contains("script"));
        }

        #[test]
        fn test_sanitize_strips_event_handlers() {
            let html = sanitize(r#"<img src="/a.png" onerror="alert(1)">"#);
            assert!(html.contains("/a.png"));
            assert!(!html.contains("onerror"));
        }

        #[test]
        fn test_plain_text_separates_blocks() {
            assert_eq!(
                plain_text("<h2>Title</h2><p>First</p><p>Second &amp; last</p>"),
                "Title First Second & last"
            );
        }

        #[test]
        fn test_excerpt_short_text_unchanged() {
            assert_eq!(generate_excerpt("<p>Short post</p>", 160), "Short post");
        }

        #[test]
        fn test_excerpt_cuts_at_word_boundary() {
            let excerpt = generate_excerpt("<p>one two three four five</p>", 12);
            assert_eq!(excerpt, "one two...");
        }

        #[test]
        fn test_reading_time() {
            assert_eq!(reading_time(""), 1);
            assert_eq!(reading_time(&"word ".repeat(200)), 1);
            assert_eq!(reading_time(&"word ".repeat(201)), 2);
            assert_eq!(reading_time(&"word ".repeat(1000)), 5);
        }
    }

    mod listing_tests {
        use crate::models::{BlogPost, CategoryColor};
        use crate::services::listing::{
            filter_posts, list, paginate, related_posts, sort_posts, ListQuery, SortOrder,
        };

        fn post(id: &str, category: &str, created_at: &str, featured: bool) -> BlogPost {
            BlogPost {
                id: id.to_string(),
                slug: id.to_string(),
                title: format!("Post {}", id),
                excerpt: String::new(),
                content: format!("<p>Body of {}</p>", id),
                cover_image: None,
                category: category.to_string(),
                category_slug: category.to_lowercase(),
                category_color: CategoryColor::Blue,
                tags: Vec::new(),
                published: true,
                featured,
                reading_time: 1,
                author: None,
                created_at: created_at.to_string(),
                updated_at: created_at.to_string(),
            }
        }

        fn sample() -> Vec<BlogPost> {
            let mut a = post("a", "Rust", "2024-01-01T00:00:00.000Z", false);
            a.title = "Ownership explained".to_string();
            a.tags = vec!["Borrowing".to_string()];
            let mut b = post("b", "Rust", "2024-02-01T00:00:00.000Z", true);
            b.excerpt = "Async traits in practice".to_string();
            let mut c = post("c", "Design", "2024-03-01T00:00:00.000Z", false);
            c.content = "<p>Notes on kerning</p>".to_string();
            let mut d = post("d", "Design", "2024-04-01T00:00:00.000Z", true);
            d.tags = vec!["color".to_string(), "borrowing".to_string()];
            vec![a, b, c, d]
        }

        fn ids(posts: &[BlogPost]) -> Vec<&str> {
            posts.iter().map(|p| p.id.as_str()).collect()
        }

        #[test]
        fn test_no_filters_keeps_everything() {
            assert_eq!(filter_posts(sample(), &ListQuery::default()).len(), 4);
        }

        #[test]
        fn test_category_all_means_no_filter() {
            let query = ListQuery {
                category: Some("all".to_string()),
                ..Default::default()
            };
            assert_eq!(filter_posts(sample(), &query).len(), 4);
        }

        #[test]
        fn test_category_filter() {
            let query = ListQuery {
                category: Some("design".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["c", "d"]);
        }

        #[test]
        fn test_search_is_case_insensitive_and_needs_every_term() {
            let query = ListQuery {
                search: Some("ASYNC practice".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["b"]);

            let query = ListQuery {
                search: Some("async ownership".to_string()),
                ..Default::default()
            };
            assert!(filter_posts(sample(), &query).is_empty());
        }

        #[test]
        fn test_search_matches_tags_and_content() {
            let query = ListQuery {
                search: Some("borrow".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["a", "d"]);

            let query = ListQuery {
                search: Some("KERNING".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["c"]);
        }

        #[test]
        fn test_search_ignores_markup() {
            let mut linked = post("e", "Rust", "2024-05-01T00:00:00.000Z", false);
            linked.content =
                r#"<p><a href="/x" class="link"><strong>go</strong> there</a></p>"#.to_string();
            let posts = vec![linked];

            for term in ["href", "class", "strong", "span"] {
                let query = ListQuery {
                    search: Some(term.to_string()),
                    ..Default::default()
                };
                assert!(
                    filter_posts(posts.clone(), &query).is_empty(),
                    "'{}' should not match markup",
                    term
                );
            }

            let query = ListQuery {
                search: Some("go there".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(posts, &query)), vec!["e"]);
        }

        #[test]
        fn test_tag_filter_exact_case_insensitive() {
            let query = ListQuery {
                tag: Some("BORROWING".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["a", "d"]);

            let query = ListQuery {
                tag: Some("borrow".to_string()),
                ..Default::default()
            };
            assert!(filter_posts(sample(), &query).is_empty());
        }

        #[test]
        fn test_filters_compose() {
            let query = ListQuery {
                category: Some("design".to_string()),
                tag: Some("borrowing".to_string()),
                ..Default::default()
            };
            assert_eq!(ids(&filter_posts(sample(), &query)), vec!["d"]);
        }

        #[test]
        fn test_sort_orders() {
            let mut posts = sample();
            sort_posts(&mut posts, SortOrder::Newest);
            assert_eq!(ids(&posts), vec!["d", "c", "b", "a"]);

            sort_posts(&mut posts, SortOrder::Oldest);
            assert_eq!(ids(&posts), vec!["a", "b", "c", "d"]);

            sort_posts(&mut posts, SortOrder::Featured);
            assert_eq!(ids(&posts), vec!["d", "b", "c", "a"]);
        }

        #[test]
        fn test_sort_is_stable_for_equal_dates() {
            let mut posts = vec![
                post("x", "Rust", "2024-01-01T00:00:00.000Z", false),
                post("y", "Rust", "2024-01-01T00:00:00.000Z", false),
            ];
            sort_posts(&mut posts, SortOrder::Newest);
            assert_eq!(ids(&posts), vec!["x", "y"]);
        }

        #[test]
        fn test_unknown_sort_falls_back_to_newest() {
            let query = ListQuery {
                sort: Some("popular".to_string()),
                ..Default::default()
            };
            assert_eq!(query.sort_order(), SortOrder::Newest);
        }

        #[test]
        fn test_paginate_clamps() {
            let items: Vec<u32> = (1..=25).collect();

            let page = paginate(items.clone(), Some(0), Some(10), 9, 50);
            assert_eq!(page.page, 1);
            assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
            assert_eq!(page.total_pages, 3);

            let page = paginate(items.clone(), Some(3), Some(10), 9, 50);
            assert_eq!(page.items, vec![21, 22, 23, 24, 25]);

            let page = paginate(items.clone(), Some(1), Some(500), 9, 50);
            assert_eq!(page.per_page, 50);
            assert_eq!(page.total_pages, 1);

            let page = paginate(items.clone(), Some(-4), Some(-1), 9, 50);
            assert_eq!(page.page, 1);
            assert_eq!(page.per_page, 1);

            let page = paginate(items, None, None, 9, 50);
            assert_eq!(page.per_page, 9);
            assert_eq!(page.total, 25);
        }

        #[test]
        fn test_page_past_end_is_empty() {
            let page = paginate(vec![1, 2, 3], Some(5), Some(2), 9, 50);
            assert!(page.items.is_empty());
            assert_eq!(page.total, 3);
            assert_eq!(page.total_pages, 2);
        }

        #[test]
        fn test_empty_listing() {
            let page = paginate(Vec::<u32>::new(), None, None, 9, 50);
            assert_eq!(page.total, 0);
            assert_eq!(page.total_pages, 0);
        }

        #[test]
        fn test_list_filters_sorts_and_pages() {
            let query = ListQuery {
                sort: Some("oldest".to_string()),
                per_page: Some(2),
                page: Some(2),
                ..Default::default()
            };
            let page = list(sample(), &query, 9, 50);
            assert_eq!(ids(&page.items), vec!["c", "d"]);
            assert_eq!(page.total, 4);
        }

        #[test]
        fn test_related_posts_same_category_excluding_self() {
            let mut posts = sample();
            posts.push(post("e", "Rust", "2024-05-01T00:00:00.000Z", false));
            posts.push(post("f", "Rust", "2024-06-01T00:00:00.000Z", false));
            posts.push(post("g", "Rust", "2024-07-01T00:00:00.000Z", false));

            let current = posts[0].clone();
            let related = related_posts(&posts, &current);
            assert_eq!(ids(&related), vec!["g", "f", "e"]);
        }
    }

    mod cache_tests {
        use crate::services::cache::QueryCache;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        #[tokio::test]
        async fn test_fresh_hit_does_not_refetch() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            let calls = AtomicUsize::new(0);
            let fetch = || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(7)
            };

            assert_eq!(cache.get_or_fetch("k", fetch).await, Ok(7));
            assert_eq!(cache.get_or_fetch("k", fetch).await, Ok(7));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_zero_stale_time_always_refetches() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::ZERO, 0);
            let calls = AtomicUsize::new(0);
            let fetch = || async {
                Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) as u32)
            };

            assert_eq!(cache.get_or_fetch("k", fetch).await, Ok(0));
            assert_eq!(cache.get_or_fetch("k", fetch).await, Ok(1));
        }

        #[tokio::test]
        async fn test_invalidate_by_prefix_forces_refetch() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            let calls = AtomicUsize::new(0);
            let fetch = || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(1)
            };

            cache.get_or_fetch("posts:all", fetch).await.unwrap();
            cache.get_or_fetch("posts:published", fetch).await.unwrap();
            cache.get_or_fetch("categories", fetch).await.unwrap();
            assert_eq!(cache.len(), 3);

            cache.invalidate("posts:");
            assert_eq!(cache.len(), 1);

            cache.get_or_fetch("posts:all", fetch).await.unwrap();
            cache.get_or_fetch("categories", fetch).await.unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 4);
        }

        #[tokio::test]
        async fn test_clear() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            cache
                .get_or_fetch("k", || async { Ok::<_, String>(1) })
                .await
                .unwrap();
            cache.clear();
            assert!(cache.is_empty());
        }

        #[tokio::test]
        async fn test_remove_is_exact() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            for key in ["post:slug:a", "post:slug:ab"] {
                cache
                    .get_or_fetch(key, || async { Ok::<_, String>(1) })
                    .await
                    .unwrap();
            }
            cache.remove("post:slug:a");
            assert_eq!(cache.len(), 1);
        }

        #[tokio::test]
        async fn test_evict_stale_drops_expired_entries() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_millis(20), 0);
            cache
                .get_or_fetch("old", || async { Ok::<_, String>(1) })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(40)).await;
            cache
                .get_or_fetch("fresh", || async { Ok::<_, String>(2) })
                .await
                .unwrap();

            assert_eq!(cache.evict_stale(), 1);
            assert_eq!(cache.len(), 1);
        }

        #[tokio::test]
        async fn test_evict_stale_drops_failed_slots() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            let _ = cache
                .get_or_fetch("broken", || async { Err::<u32, _>("down".to_string()) })
                .await;
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.evict_stale(), 1);
            assert!(cache.is_empty());
        }

        #[tokio::test]
        async fn test_retries_then_succeeds() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 3)
                .with_retry_base(Duration::from_millis(1));
            let calls = AtomicUsize::new(0);
            let fetch = || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("flaky".to_string())
                } else {
                    Ok(42)
                }
            };

            assert_eq!(cache.get_or_fetch("k", fetch).await, Ok(42));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_gives_up_after_retry_budget() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 2)
                .with_retry_base(Duration::from_millis(1));
            let calls = AtomicUsize::new(0);
            let fetch = || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("down".to_string())
            };

            assert_eq!(
                cache.get_or_fetch("k", fetch).await,
                Err("down".to_string())
            );
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_failed_fetch_is_not_cached() {
            let cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(60), 0);
            let failing = cache
                .get_or_fetch("k", || async { Err::<u32, _>("down".to_string()) })
                .await;
            assert!(failing.is_err());

            let ok = cache
                .get_or_fetch("k", || async { Ok::<_, String>(5) })
                .await;
            assert_eq!(ok, Ok(5));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        async fn test_concurrent_fetches_are_deduplicated() {
            let cache: Arc<QueryCache<u32>> =
                Arc::new(QueryCache::new(Duration::from_secs(60), 0));
            let calls = Arc::new(AtomicUsize::new(0));

            let mut handles = Vec::new();
            for _ in 0..8 {
                let cache = cache.clone();
                let calls = calls.clone();
                handles.push(tokio::spawn(async move {
                    cache
                        .get_or_fetch("shared", || {
                            let calls = calls.clone();
                            async move {
                                calls.fetch_add(1, Ordering::SeqCst);
                                tokio::time::sleep(Duration::from_millis(50)).await;
                                Ok::<_, String>(9)
                            }
                        })
                        .await
                }));
            }

            for handle in handles {
                assert_eq!(handle.await.unwrap(), Ok(9));
            }
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    mod config_tests {
        use crate::models::CategoryColor;
        use crate::Config;

        const MINIMAL: &str = r#"
[site]
title = "Test"
url = "http://localhost:3000"

[database]
path = "./data/test.db"
"#;

        #[test]
        fn test_minimal_config_gets_defaults() {
            let config = Config::parse(MINIMAL).unwrap();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.content.posts_per_page, 9);
            assert_eq!(config.content.default_category, "General");
            assert_eq!(config.content.default_category_color, CategoryColor::Blue);
            assert_eq!(config.cache.stale_time_secs, 300);
            assert_eq!(config.cache.retry, 3);
            assert!(config.store.fallback_to_mock);
            assert!(config.contact.enabled);
        }

        #[test]
        fn test_invalid_site_url_rejected() {
            let toml = MINIMAL.replace("http://localhost:3000", "not a url");
            assert!(Config::parse(&toml).is_err());
        }

        #[test]
        fn test_wildcard_cors_origin_rejected() {
            let toml = format!("{}\n[server]\ncors_origins = [\"*\"]\n", MINIMAL);
            let err = Config::parse(&toml).unwrap_err();
            assert!(err.to_string().contains("cors_origins"));
        }

        #[test]
        fn test_explicit_cors_origins_accepted() {
            let toml = format!(
                "{}\n[server]\ncors_origins = [\"http://localhost:5173\", \"https://example.com\"]\n",
                MINIMAL
            );
            let config = Config::parse(&toml).unwrap();
            assert_eq!(config.server.cors_origins.len(), 2);
        }

        #[test]
        fn test_router_skips_wildcard_origin() {
            use crate::models::Portfolio;
            use crate::store::{DynStore, MockStore};
            use crate::web::{self, AppState};
            use std::sync::Arc;

            let mut config = Config::parse(MINIMAL).unwrap();
            config.server.cors_origins = vec!["*".to_string(), "http://localhost:5173".to_string()];
            let db = crate::Database::open_memory("cors_wildcard_router").unwrap();
            let store: DynStore = Arc::new(MockStore);
            let state = AppState::with_store(config, db, store, Portfolio::default());
            let _router = web::router(Arc::new(state));
        }

        #[test]
        fn test_zero_posts_per_page_rejected() {
            let toml = format!("{}\n[content]\nposts_per_page = 0\n", MINIMAL);
            assert!(Config::parse(&toml).is_err());
        }

        #[test]
        fn test_webhook_url_must_be_http() {
            let toml = format!(
                "{}\n[contact]\nwebhook_url = \"ftp://example.com/hook\"\n",
                MINIMAL
            );
            assert!(Config::parse(&toml).is_err());
        }

        #[test]
        fn test_session_days() {
            let mut config = Config::parse(MINIMAL).unwrap();
            assert_eq!(config.auth.session_days(), 7);
            config.auth.session_lifetime = "30d".to_string();
            assert_eq!(config.auth.session_days(), 30);
            config.auth.session_lifetime = "36h".to_string();
            assert_eq!(config.auth.session_days(), 2);
            config.auth.session_lifetime = "soon".to_string();
            assert_eq!(config.auth.session_days(), 7);
        }
    }

    mod role_tests {
        use crate::models::UserRole;

        #[test]
        fn test_roles_parse_case_insensitively() {
            assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
            assert_eq!("editor".parse::<UserRole>(), Ok(UserRole::Editor));
            assert!("author".parse::<UserRole>().is_err());
        }

        #[test]
        fn test_only_admins_and_editors_change_content() {
            assert!(UserRole::Admin.can_edit());
            assert!(UserRole::Editor.can_edit());
            assert!(!UserRole::Viewer.can_edit());
        }
    }

    mod password_tests {
        use crate::services::auth::{dummy_hash, hash_password, verify_password};
        use argon2::password_hash::{PasswordHash, PasswordVerifier};
        use argon2::Argon2;
        use std::time::Instant;

        #[test]
        fn test_dummy_hash_is_a_real_argon2_hash() {
            let hash = dummy_hash().expect("dummy hash should build");
            let parsed = PasswordHash::new(hash).unwrap();
            assert!(Argon2::default()
                .verify_password(b"folio-unknown-user", &parsed)
                .is_ok());
        }

        #[test]
        fn test_unknown_user_pays_for_a_verification() {
            let real = hash_password("Password123").unwrap();
            // First call builds the dummy hash.
            assert!(!verify_password("warmup", ""));

            let start = Instant::now();
            assert!(!verify_password("WrongPass456", &real));
            let known = start.elapsed();

            let start = Instant::now();
            assert!(!verify_password("WrongPass456", ""));
            let unknown = start.elapsed();

            assert!(
                unknown * 3 >= known,
                "unknown user took {:?}, known user {:?}",
                unknown,
                known
            );
        }

        #[test]
        fn test_correct_password_verifies() {
            let hash = hash_password("Password123").unwrap();
            assert!(verify_password("Password123", &hash));
            assert!(!verify_password("Password124", &hash));
        }
    }

    mod security_tests {
        use crate::web::security::RateLimiter;
        use std::time::Duration;

        #[test]
        fn test_rate_limiter_blocks_after_max_attempts() {
            let limiter = RateLimiter::new(3, Duration::from_secs(60));
            for _ in 0..3 {
                assert!(limiter.retry_after("1.2.3.4").is_none());
                limiter.record_attempt("1.2.3.4");
            }
            let wait = limiter.retry_after("1.2.3.4").unwrap();
            assert!(wait > Duration::from_secs(59));
            assert!(limiter.retry_after("5.6.7.8").is_none());
        }

        #[test]
        fn test_rate_limiter_clear_resets_key() {
            let limiter = RateLimiter::new(1, Duration::from_secs(60));
            limiter.record_attempt("ip");
            assert!(limiter.retry_after("ip").is_some());
            limiter.clear("ip");
            assert!(limiter.retry_after("ip").is_none());
        }

        #[test]
        fn test_rate_limiter_lockout_expires() {
            let limiter = RateLimiter::new(1, Duration::from_millis(10));
            limiter.record_attempt("ip");
            std::thread::sleep(Duration::from_millis(30));
            assert!(limiter.retry_after("ip").is_none());
        }

        #[test]
        fn test_lockout_runs_a_full_window_from_the_last_failure() {
            let limiter = RateLimiter::new(2, Duration::from_millis(200));
            limiter.record_attempt("ip");
            std::thread::sleep(Duration::from_millis(150));
            limiter.record_attempt("ip");

            // The first failure has aged out, but the lockout started at the second.
            std::thread::sleep(Duration::from_millis(100));
            assert!(limiter.retry_after("ip").is_some());

            std::thread::sleep(Duration::from_millis(150));
            assert!(limiter.retry_after("ip").is_none());
        }

        #[test]
        fn test_spread_out_failures_do_not_lock() {
            let limiter = RateLimiter::new(2, Duration::from_millis(50));
            limiter.record_attempt("ip");
            std::thread::sleep(Duration::from_millis(80));
            limiter.record_attempt("ip");
            assert!(limiter.retry_after("ip").is_none());
        }

        #[test]
        fn test_cleanup_keeps_active_lockouts() {
            let limiter = RateLimiter::new(1, Duration::from_secs(60));
            limiter.record_attempt("locked");
            limiter.cleanup();
            assert!(limiter.retry_after("locked").is_some());
        }
    }

    mod webhook_tests {
        use crate::services::webhook::sign;

        #[test]
        fn test_signature_format_and_determinism() {
            let a = sign("secret", r#"{"a":1}"#).unwrap();
            let b = sign("secret", r#"{"a":1}"#).unwrap();
            assert_eq!(a, b);
            assert!(a.starts_with("sha256="));
            assert_eq!(a.len(), "sha256=".len() + 64);
        }

        #[test]
        fn test_signature_depends_on_secret() {
            assert_ne!(
                sign("one", "payload").unwrap(),
                sign("two", "payload").unwrap()
            );
        }
    }

    mod portfolio_tests {
        use crate::services::portfolio::{load, parse, projects};
        use std::path::Path;

        const DATA: &str = r#"
[[projects]]
id = "one"
title = "One"
description = "First"
technologies = ["Rust"]
featured = true

[[projects]]
id = "two"
title = "Two"
description = "Second"

[cv]
name = "Jane Doe"
headline = "Engineer"
"#;

        #[test]
        fn test_parse_and_filter_featured() {
            let portfolio = parse(DATA).unwrap();
            assert_eq!(projects(&portfolio, false).len(), 2);
            let featured = projects(&portfolio, true);
            assert_eq!(featured.len(), 1);
            assert_eq!(featured[0].id, "one");
            assert_eq!(portfolio.cv.unwrap().name, "Jane Doe");
        }

        #[test]
        fn test_duplicate_project_ids_rejected() {
            let data = DATA.replace("id = \"two\"", "id = \"one\"");
            assert!(parse(&data).is_err());
        }

        #[test]
        fn test_missing_file_is_empty_portfolio() {
            let portfolio = load(Some(Path::new("/nonexistent/portfolio.toml"))).unwrap();
            assert!(portfolio.projects.is_empty());
            assert!(portfolio.cv.is_none());
            assert!(load(None).unwrap().projects.is_empty());
        }
    }
}
