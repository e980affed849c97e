//! CLI Command Tests
//!
//! Argument parsing, input validation, and the search/info commands run
//! end to end against a mocked OMDb.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use moviefinder::cli::{Cli, Command, MediaTypeFilter};

    #[test]
    fn test_command_aliases() {
        let cli = Cli::parse_from(["moviefinder", "s", "alien"]);
        assert!(matches!(cli.command, Some(Command::Search(_))));

        let cli = Cli::parse_from(["moviefinder", "i", "tt0078748"]);
        assert!(matches!(cli.command, Some(Command::Info(_))));
    }

    #[test]
    fn test_search_long_flags() {
        let cli = Cli::parse_from([
            "moviefinder",
            "search",
            "star wars",
            "--limit",
            "5",
            "--type",
            "game",
        ]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "star wars");
                assert_eq!(cmd.limit, 5);
                assert_eq!(cmd.media_type, Some(MediaTypeFilter::Game));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["moviefinder", "search"]).is_err());
        assert!(Cli::try_parse_from(["moviefinder", "search", "x", "-t", "podcast"]).is_err());
    }

    #[test]
    fn test_json_flag_forces_json() {
        let cli = Cli::parse_from(["moviefinder", "-j", "info", "tt0078748"]);
        assert!(cli.should_json());
    }
}

// =============================================================================
// IMDB ID Validation Tests
// =============================================================================

mod imdb_validation {
    use moviefinder::cli::validate_imdb_id;

    #[test]
    fn test_valid_imdb_ids() {
        assert!(validate_imdb_id("tt0078748").is_ok());
        assert!(validate_imdb_id("tt1234567890").is_ok());
    }

    #[test]
    fn test_invalid_imdb_ids() {
        // Letters in numeric part
        assert!(validate_imdb_id("tt123abc7").is_err());

        // Empty
        assert!(validate_imdb_id("").is_err());
        assert!(validate_imdb_id("tt").is_err());
    }
}

// =============================================================================
// Command Tests
// =============================================================================

mod commands {
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use std::time::Duration;

    use moviefinder::cli::{ExitCode, InfoCmd, MediaTypeFilter, Output, SearchCmd};
    use moviefinder::commands::{info_cmd, search_cmd};
    use moviefinder::retry::RetryPolicy;
    use moviefinder::session::{SearchSession, SessionConfig};
    use moviefinder::OmdbClient;

    const SEARCH_BODY: &str = r#"{
        "Search": [
            {"Title": "Alien", "Year": "1979", "imdbID": "tt0078748", "Type": "movie", "Poster": "N/A"},
            {"Title": "Alien Nation", "Year": "1989–1990", "imdbID": "tt0096532", "Type": "series", "Poster": "N/A"},
            {"Title": "Aliens", "Year": "1986", "imdbID": "tt0090605", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "3",
        "Response": "True"
    }"#;

    fn quiet() -> Output {
        Output {
            json: false,
            quiet: true,
        }
    }

    fn session_for(base_url: &str) -> SearchSession {
        let config = SessionConfig {
            search_retry: RetryPolicy::new(1, Duration::from_millis(10)),
            detail_retry: RetryPolicy::new(1, Duration::from_millis(10)),
            ..Default::default()
        };
        SearchSession::with_config(
            Arc::new(OmdbClient::with_base_url("test_key", base_url)),
            config,
        )
    }

    fn search(query: &str, media_type: Option<MediaTypeFilter>) -> SearchCmd {
        SearchCmd {
            query: query.to_string(),
            limit: 10,
            media_type,
        }
    }

    #[tokio::test]
    async fn test_search_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("s".into(), "alien".into()))
            .with_status(200)
            .with_body(SEARCH_BODY)
            .create_async()
            .await;

        let session = session_for(&server.url());
        let code = search_cmd(search(" alien ", None), &session, &quiet()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
        assert_eq!(session.state().results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_with_type_filter_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(SEARCH_BODY)
            .create_async()
            .await;

        let session = session_for(&server.url());
        let output = Output {
            json: true,
            quiet: false,
        };
        let code = search_cmd(
            search("alien", Some(MediaTypeFilter::Series)),
            &session,
            &output,
        )
        .await;

        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_search_invalid_query_skips_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let session = session_for(&server.url());
        let code = search_cmd(search("a", None), &session, &quiet()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_search_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Response":"False","Error":"Movie not found!"}"#)
            .create_async()
            .await;

        let session = session_for(&server.url());
        let code = search_cmd(search("zzqx", None), &session, &quiet()).await;

        assert_eq!(code, ExitCode::Error);
        assert_eq!(
            session.state().error.as_deref(),
            Some("No movie found for \"zzqx\". Try another term.")
        );
    }

    #[tokio::test]
    async fn test_search_unreachable_exhausts_retries() {
        let session = session_for("http://127.0.0.1:1");
        let code = search_cmd(search("alien", None), &session, &quiet()).await;

        assert_eq!(code, ExitCode::Error);
        let error = session.state().error.unwrap();
        assert!(error.ends_with("All attempts failed."), "got {error}");
    }

    #[tokio::test]
    async fn test_info_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("i".into(), "tt0078748".into()))
            .with_status(200)
            .with_body(
                r#"{"Title":"Alien","Year":"1979","Director":"Ridley Scott",
                    "imdbRating":"8.5","imdbID":"tt0078748","Response":"True"}"#,
            )
            .create_async()
            .await;

        let session = session_for(&server.url());
        let cmd = InfoCmd {
            imdb_id: "tt0078748".into(),
        };
        let code = info_cmd(cmd, &session, &quiet()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
        let selected = session.state().selected.unwrap();
        assert_eq!(selected.director.as_deref(), Some("Ridley Scott"));
    }

    #[tokio::test]
    async fn test_info_invalid_id() {
        let session = session_for("http://127.0.0.1:1");
        let cmd = InfoCmd {
            imdb_id: "alien".into(),
        };

        assert_eq!(info_cmd(cmd, &session, &quiet()).await, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_info_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#)
            .create_async()
            .await;

        let session = session_for(&server.url());
        let cmd = InfoCmd {
            imdb_id: "tt0000000".into(),
        };

        assert_eq!(info_cmd(cmd, &session, &quiet()).await, ExitCode::Error);
    }
}
