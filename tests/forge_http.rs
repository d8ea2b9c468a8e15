//! HTTP-level tests for the hosting providers.
//!
//! A wiremock server stands in for each API. The providers use a blocking
//! client, so every call runs on a blocking thread and the provider is
//! created and dropped there.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use releasegate::forge::bitbucket::BitbucketProvider;
use releasegate::forge::github::GitHubProvider;
use releasegate::forge::gitlab::GitLabProvider;
use releasegate::forge::{Credentials, ForgeError, HostingProvider, Issue, ReleaseRequest};

const GITHUB_ORIGIN: &str = "git@github.com:acme/widget.git";

fn release_request(prerelease: bool) -> ReleaseRequest {
    ReleaseRequest {
        tag_name: "1.2.0".into(),
        source_ref: "main".into(),
        release_notes: "## 1.2.0\n\n- Faster widgets.".into(),
        is_prerelease: prerelease,
    }
}

async fn github_issues(uri: String, credentials: Credentials) -> Result<Vec<Issue>, ForgeError> {
    tokio::task::spawn_blocking(move || {
        GitHubProvider::from_origin(GITHUB_ORIGIN, &uri, credentials)?.list_open_issues()
    })
    .await
    .unwrap()
}

mod github {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn lists_issues_across_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/issues"))
            .and(query_param("sort", "created"))
            .and(query_param("direction", "asc"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"number": 3, "title": "Docs typo", "html_url": "https://github.com/acme/widget/issues/3"},
                {"number": 8, "title": "Crash on empty input", "html_url": "https://github.com/acme/widget/issues/8"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/issues"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = github_issues(server.uri(), Credentials::Bearer("ghp_test".into()))
            .await
            .unwrap();

        assert_eq!(
            issues,
            vec![
                Issue {
                    number: 3,
                    title: "Docs typo".into(),
                    url: "https://github.com/acme/widget/issues/3".into(),
                },
                Issue {
                    number: 8,
                    title: "Crash on empty input".into(),
                    url: "https://github.com/acme/widget/issues/8".into(),
                },
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn username_and_token_use_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/issues"))
            .and(header("authorization", "Basic bWU6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = github_issues(
            server.uri(),
            Credentials::Basic {
                username: "me".into(),
                password: "secret".into(),
            },
        )
        .await
        .unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn publishes_release() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/releases"))
            .and(body_partial_json(json!({
                "tag_name": "1.2.0",
                "target_commitish": "main",
                "name": "1.2.0",
                "draft": false,
                "prerelease": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            GitHubProvider::from_origin(GITHUB_ORIGIN, &uri, Credentials::Bearer("t".into()))?
                .publish_release(&release_request(true))
        })
        .await
        .unwrap();
        assert_eq!(result, Ok(()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn release_without_id_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            GitHubProvider::from_origin(GITHUB_ORIGIN, &uri, Credentials::Bearer("t".into()))?
                .publish_release(&release_request(false))
        })
        .await
        .unwrap();
        assert!(matches!(result, Err(ForgeError::ReleaseRejected(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn status_codes_map_to_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            )
            .mount(&server)
            .await;

        let err = github_issues(server.uri(), Credentials::Bearer("bad".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::AuthFailed(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_json_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = github_issues(server.uri(), Credentials::None)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Transport(_)));
    }
}

mod gitlab {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn lists_issues_with_private_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/projects/group(%2F|/)widget/issues$"))
            .and(query_param("private_token", "glpat"))
            .and(query_param("sort", "asc"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 9001, "iid": 4, "title": "Flaky test", "web_url": "https://gitlab.com/group/widget/-/issues/4"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let uri = server.uri();
        let issues = tokio::task::spawn_blocking(move || {
            GitLabProvider::from_origin("git@gitlab.com:group/widget.git", &uri, "glpat")?
                .list_open_issues()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 4);
        assert_eq!(issues[0].url, "https://gitlab.com/group/widget/-/issues/4");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tag_release_confirmed_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/projects/group(%2F|/)widget/repository/tags$"))
            .and(query_param("private_token", "glpat"))
            .and(body_partial_json(json!({
                "tag_name": "1.2.0",
                "ref": "main",
                "release_description": "## 1.2.0\n\n- Faster widgets."
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "1.2.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            GitLabProvider::from_origin("git@gitlab.com:group/widget.git", &uri, "glpat")?
                .publish_release(&release_request(false))
        })
        .await
        .unwrap();
        assert_eq!(result, Ok(()));
    }
}

mod bitbucket {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn lists_wrapped_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repositories/acme/widget/issues"))
            .and(query_param("sort", "created_on"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Basic bWU6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [{"id": 12, "title": "Wrong colour"}],
                "page": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": []})))
            .mount(&server)
            .await;

        let uri = server.uri();
        let issues = tokio::task::spawn_blocking(move || {
            BitbucketProvider::from_origin("git@bitbucket.org:acme/widget.git", &uri, "me", "secret")?
                .list_open_issues()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 12);
        assert_eq!(issues[0].url, "https://bitbucket.org/acme/widget/issues/12");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn release_never_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "1.2.0"})))
            .expect(0)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            BitbucketProvider::from_origin("git@bitbucket.org:acme/widget.git", &uri, "me", "secret")?
                .publish_release(&release_request(false))
        })
        .await
        .unwrap();
        assert!(matches!(result, Err(ForgeError::ReleaseRejected(_))));
    }
}
