//! engine::pipeline
//!
//! The validation pipeline and the standalone operations built from its
//! steps: [`show_issues`], [`lint_docs`] and [`tag_version`].
//!
//! # Steps
//!
//! | # | Step | On failure |
//! |---|------|------------|
//! | 1 | version grammar | `InvalidVersion` |
//! | 2 | sync with remote | `Sync` |
//! | 3 | manifest | `Manifest` |
//! | 4 | support files | `MissingSupportFile` |
//! | 5 | license year | warning |
//! | 6 | tests | `TestFailure` |
//! | 7 | doc lint (skipped for 0.x, dev, alpha) | `DocLint` |
//! | 8 | changelog date vs last commit | `ChangelogStale` |
//! | 9 | open issues | warning |
//!
//! A release adds publish (10-11) and a final sync (12).

use std::time::Duration;

use chrono::{Datelike, Local};

use super::context::{Step, ValidationContext};
use super::PipelineError;
use crate::checks::CheckRunner;
use crate::core::config::Config;
use crate::core::version::Version;
use crate::forge::{HostingProvider, Issue, ReleaseRequest};
use crate::repo::{CommitDate, RepositoryGateway};
use crate::ui::output::Logger;
use crate::ui::prompts::countdown;

/// Format used when reporting commit dates.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Ordered, fail-fast release checks over injected collaborators.
pub struct ValidationPipeline<'a> {
    repo: &'a dyn RepositoryGateway,
    checks: &'a dyn CheckRunner,
    forge: &'a dyn HostingProvider,
    config: &'a Config,
    logger: Logger,
    year: i32,
}

impl<'a> ValidationPipeline<'a> {
    pub fn new(
        repo: &'a dyn RepositoryGateway,
        checks: &'a dyn CheckRunner,
        forge: &'a dyn HostingProvider,
        config: &'a Config,
        logger: Logger,
    ) -> Self {
        Self {
            repo,
            checks,
            forge,
            config,
            logger,
            year: Local::now().year(),
        }
    }

    /// Use `year` as the current year for the license check.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Run steps 1-9.
    ///
    /// # Errors
    ///
    /// The first fatal step's error. Later steps do not run.
    pub fn validate(&self, version: &str) -> Result<ValidationContext, PipelineError> {
        let mut ctx = ValidationContext::new(parse_version(version)?);
        ctx.pass(Step::Version);

        self.repo.sync().map_err(PipelineError::Sync)?;
        ctx.pass(Step::Sync);

        self.checks.validate_manifest()?;
        ctx.package_name = Some(self.checks.package_name()?);
        ctx.pass(Step::Manifest);
        self.logger
            .info(format!("Validating {} {}", ctx.package(), ctx.version));

        for file in self.config.support_files() {
            self.checks.check_support_file(&file)?;
        }
        ctx.pass(Step::SupportFiles);

        self.check_license_year(&mut ctx)?;

        self.checks.run_tests()?;
        ctx.pass(Step::Tests);

        match ctx.version.doc_lint_skip_reason() {
            Some(reason) => {
                self.logger
                    .info(format!("Skipping documentation lint for {}.", reason));
                ctx.skip(Step::DocLint, reason);
            }
            None => {
                self.checks.lint_docs()?;
                ctx.pass(Step::DocLint);
            }
        }

        self.check_changelog()?;
        ctx.pass(Step::Changelog);

        self.check_issues(&mut ctx)?;
        ctx.pass(Step::Issues);

        self.logger.info(format!(
            "{} {} appears valid for release!",
            ctx.package(),
            ctx.version
        ));
        Ok(ctx)
    }

    /// Validate, then publish the release and sync.
    ///
    /// Waits `delay` after the warning so the operator can cancel.
    pub fn release(
        &self,
        version: &str,
        delay: Duration,
    ) -> Result<ValidationContext, PipelineError> {
        self.logger.warn("THIS WILL RELEASE THE PACKAGE.");
        countdown(&self.logger, "Releasing", delay);

        let mut ctx = self.validate(version)?;
        self.logger
            .info(format!("Releasing {} {}", ctx.package(), ctx.version));

        let branch = self.repo.branch()?;
        let request = ReleaseRequest {
            tag_name: ctx.version.to_string(),
            source_ref: branch.clone(),
            release_notes: self.checks.read_file(&self.config.changelog_file())?,
            is_prerelease: ctx.version.is_prerelease(),
        };
        ctx.branch = Some(branch);

        self.forge.publish_release(&request)?;
        ctx.pass(Step::Publish);

        self.repo.sync().map_err(PipelineError::Sync)?;
        ctx.pass(Step::Resync);

        self.logger
            .info(format!("Released {} {} !", ctx.package(), ctx.version));
        Ok(ctx)
    }

    fn check_license_year(&self, ctx: &mut ValidationContext) -> Result<(), PipelineError> {
        let license = self.checks.read_file(&self.config.license_file())?;
        if license.contains(&self.year.to_string()) {
            ctx.pass(Step::LicenseYear);
        } else {
            let message = format!(
                "The {} copyright year (or range of years) looks out-of-date.",
                self.config.license_file()
            );
            self.logger.warn(&message);
            ctx.warn(message);
        }
        Ok(())
    }

    fn check_changelog(&self) -> Result<(), PipelineError> {
        let changelog = self.config.changelog_file();
        self.logger
            .info(format!("Checking if {} is up to date.", changelog));

        let changelog_date = self.repo.file_date(&changelog)?;
        self.logger
            .info(format!("{} date is {}.", changelog, format_date(&changelog_date)));

        let last_commit = self.repo.last_commit_date()?;
        self.logger
            .info(format!("Last commit date is {}.", format_date(&last_commit)));

        if changelog_date == last_commit {
            self.logger
                .info(format!("{} appears up to date.", changelog));
            return Ok(());
        }

        self.logger
            .error(format!("{} appears out of date.", changelog));
        for line in self.repo.log_since(&changelog_date)? {
            self.logger.info(line);
        }
        Err(PipelineError::ChangelogStale {
            changelog,
            changelog_date: format_date(&changelog_date),
            last_commit: format_date(&last_commit),
        })
    }

    fn check_issues(&self, ctx: &mut ValidationContext) -> Result<(), PipelineError> {
        let issues = self.forge.list_open_issues()?;
        if issues.is_empty() {
            self.logger.info("No open issues.");
            return Ok(());
        }

        self.logger.warn("There are open issues:");
        for issue in &issues {
            self.logger.warn(format!("    {}. {}", issue.number, issue.title));
            self.logger.warn(format!("        {}", issue.url));
            ctx.warn(format!("open issue {}", issue));
        }
        Ok(())
    }
}

/// Print the open issues of `forge` under a repository header.
///
/// Prints nothing when there are none.
pub fn show_issues(
    forge: &dyn HostingProvider,
    logger: &Logger,
) -> Result<Vec<Issue>, PipelineError> {
    let issues = forge.list_open_issues()?;
    if issues.is_empty() {
        return Ok(issues);
    }

    logger.info(forge.repo_identity());
    logger.info("");
    for issue in &issues {
        logger.info(format!("    {}. {}", issue.number, issue.title));
        logger.info(format!("        {}", issue.url));
        logger.info("");
    }
    Ok(issues)
}

/// Run the documentation lint alone, regardless of version.
pub fn lint_docs(checks: &dyn CheckRunner, logger: &Logger) -> Result<(), PipelineError> {
    logger.info("Checking documentation.");
    checks.lint_docs()?;
    logger.info("Documentation appears valid.");
    Ok(())
}

/// Create a local annotated tag for `version` with the changelog as its
/// message. Nothing is pushed.
pub fn tag_version(
    repo: &dyn RepositoryGateway,
    checks: &dyn CheckRunner,
    config: &Config,
    logger: &Logger,
    version: &str,
) -> Result<Version, PipelineError> {
    let version = parse_version(version)?;
    let notes = checks.read_file(&config.changelog_file())?;
    repo.tag(version.as_str(), &notes)?;
    logger.info(format!("Tagged {}.", version));
    Ok(version)
}

fn parse_version(version: &str) -> Result<Version, PipelineError> {
    if version.trim().is_empty() {
        return Err(PipelineError::MissingVersion);
    }
    Ok(Version::new(version)?)
}

fn format_date(date: &CommitDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::mock::{CheckOp, MockChecks};
    use crate::checks::CheckError;
    use crate::forge::mock::{FailOn, MockProvider, MockOperation};
    use crate::forge::ForgeError;
    use crate::repo::mock::{MockRepository, RepoOp};
    use crate::repo::{parse_commit_date, RepoError};

    const LAST_COMMIT: &str = "2024-03-01T10:00:00+00:00";

    fn date(s: &str) -> CommitDate {
        parse_commit_date(s).unwrap()
    }

    fn repo() -> MockRepository {
        MockRepository::new("git@github.com:acme/widget.git", "main", date(LAST_COMMIT))
    }

    fn checks() -> MockChecks {
        MockChecks::new("widget")
            .with_file("LICENSE", "Copyright (c) 2019-2024 Acme")
            .with_file("CHANGELOG.md", "## 1.0.0\n\n- First stable release.\n")
    }

    fn issue(number: u64) -> Issue {
        Issue {
            number,
            title: format!("Issue {}", number),
            url: format!("https://github.com/acme/widget/issues/{}", number),
        }
    }

    struct Fixture {
        repo: MockRepository,
        checks: MockChecks,
        forge: MockProvider,
        config: Config,
        logger: Logger,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                repo: repo(),
                checks: checks(),
                forge: MockProvider::new("acme/widget"),
                config: Config::default(),
                logger: Logger::capture(),
            }
        }

        fn pipeline(&self) -> ValidationPipeline<'_> {
            ValidationPipeline::new(
                &self.repo,
                &self.checks,
                &self.forge,
                &self.config,
                self.logger.clone(),
            )
            .with_year(2024)
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn clean_run_passes_every_step() {
            let f = Fixture::new();
            let ctx = f.pipeline().validate("1.0.0").unwrap();

            assert_eq!(
                ctx.checks_passed,
                vec![
                    Step::Version,
                    Step::Sync,
                    Step::Manifest,
                    Step::SupportFiles,
                    Step::LicenseYear,
                    Step::Tests,
                    Step::DocLint,
                    Step::Changelog,
                    Step::Issues,
                ]
            );
            assert!(ctx.warnings.is_empty());
            assert_eq!(ctx.package(), "widget");

            let out = f.logger.captured().out;
            assert_eq!(out.first().unwrap(), "Validating widget 1.0.0");
            assert_eq!(out.last().unwrap(), "widget 1.0.0 appears valid for release!");
            assert!(f.logger.captured().err.is_empty());
        }

        #[test]
        fn missing_version() {
            let f = Fixture::new();
            let err = f.pipeline().validate("").unwrap_err();
            assert!(matches!(err, PipelineError::MissingVersion));
            assert!(f.repo.calls().is_empty());
        }

        #[test]
        fn invalid_version_runs_nothing() {
            let f = Fixture::new();
            let err = f.pipeline().validate("1.2").unwrap_err();
            assert!(matches!(err, PipelineError::InvalidVersion(_)));
            assert!(f.repo.calls().is_empty());
            assert_eq!(f.checks.call_count(CheckOp::ValidateManifest), 0);
        }

        #[test]
        fn dirty_worktree_is_a_sync_error() {
            let mut f = Fixture::new();
            f.repo = repo().fail_on(
                RepoOp::Sync,
                RepoError::DirtyWorktree(vec!["?? notes.txt".into()]),
            );
            let err = f.pipeline().validate("1.0.0").unwrap_err();
            assert!(matches!(err, PipelineError::Sync(RepoError::DirtyWorktree(_))));
            assert_eq!(f.checks.call_count(CheckOp::ValidateManifest), 0);
        }

        #[test]
        fn stale_license_year_only_warns() {
            let mut f = Fixture::new();
            f.checks = checks().with_file("LICENSE", "Copyright (c) 2019 Acme");
            let ctx = f.pipeline().validate("1.0.0").unwrap();

            assert!(!ctx.passed(Step::LicenseYear));
            assert!(ctx.passed(Step::Tests));
            assert_eq!(
                f.logger.captured().err,
                vec!["warning: The LICENSE copyright year (or range of years) looks out-of-date."]
            );
        }

        #[test]
        fn failing_tests_stop_the_run() {
            let mut f = Fixture::new();
            f.checks = checks().fail_on(
                CheckOp::RunTests,
                CheckError::TestFailure("test result: FAILED. 3 passed; 1 failed".into()),
            );
            let err = f.pipeline().validate("1.0.0").unwrap_err();

            assert_eq!(
                err.to_string(),
                "tests failed: test result: FAILED. 3 passed; 1 failed"
            );
            assert_eq!(f.checks.call_count(CheckOp::LintDocs), 0);
            assert_eq!(f.repo.call_count(RepoOp::FileDate), 0);
            assert!(f.forge.operations().is_empty());
        }

        #[test]
        fn doc_lint_skip_is_logged() {
            let f = Fixture::new();
            let ctx = f.pipeline().validate("0.3.0").unwrap();

            assert_eq!(f.checks.call_count(CheckOp::LintDocs), 0);
            assert_eq!(
                ctx.skipped,
                vec![(Step::DocLint, "0.x versions".to_string())]
            );
            assert!(f
                .logger
                .captured()
                .out
                .contains(&"Skipping documentation lint for 0.x versions.".to_string()));
        }

        #[test]
        fn beta_still_lints_docs() {
            let f = Fixture::new();
            f.pipeline().validate("2.0.0-beta2").unwrap();
            assert_eq!(f.checks.call_count(CheckOp::LintDocs), 1);
        }

        #[test]
        fn stale_changelog_logs_commits_and_fails() {
            let mut f = Fixture::new();
            f.repo = repo()
                .with_file_date("CHANGELOG.md", date("2024-02-01T09:00:00+00:00"))
                .with_log(vec!["commit abc123".into(), "    src/lib.rs".into()]);
            let err = f.pipeline().validate("1.0.0").unwrap_err();

            match err {
                PipelineError::ChangelogStale {
                    changelog,
                    changelog_date,
                    last_commit,
                } => {
                    assert_eq!(changelog, "CHANGELOG.md");
                    assert_eq!(changelog_date, "2024-02-01 09:00:00 +0000");
                    assert_eq!(last_commit, "2024-03-01 10:00:00 +0000");
                }
                other => panic!("unexpected error: {other}"),
            }

            let captured = f.logger.captured();
            assert!(captured.out.contains(&"commit abc123".to_string()));
            assert!(captured
                .err
                .contains(&"error: CHANGELOG.md appears out of date.".to_string()));
            assert!(f.forge.operations().is_empty());
        }

        #[test]
        fn same_instant_in_other_offset_is_up_to_date() {
            let mut f = Fixture::new();
            f.repo = repo().with_file_date("CHANGELOG.md", date("2024-03-01T12:00:00+02:00"));
            assert!(f.pipeline().validate("1.0.0").is_ok());
        }

        #[test]
        fn open_issues_warn_without_failing() {
            let mut f = Fixture::new();
            f.forge = MockProvider::new("acme/widget").with_issues(vec![issue(4), issue(9)]);
            let ctx = f.pipeline().validate("1.0.0").unwrap();

            assert_eq!(ctx.warnings.len(), 2);
            assert_eq!(
                f.logger.captured().err,
                vec![
                    "warning: There are open issues:",
                    "warning:     4. Issue 4",
                    "warning:         https://github.com/acme/widget/issues/4",
                    "warning:     9. Issue 9",
                    "warning:         https://github.com/acme/widget/issues/9",
                ]
            );
        }

        #[test]
        fn issue_listing_failure_is_fatal() {
            let mut f = Fixture::new();
            f.forge = MockProvider::new("acme/widget")
                .fail_on(FailOn::ListOpenIssues(ForgeError::RateLimited));
            let err = f.pipeline().validate("1.0.0").unwrap_err();
            assert!(matches!(err, PipelineError::Forge(ForgeError::RateLimited)));
        }
    }

    mod release {
        use super::*;

        #[test]
        fn publishes_then_syncs() {
            let f = Fixture::new();
            let ctx = f.pipeline().release("1.0.0", Duration::ZERO).unwrap();

            assert!(ctx.passed(Step::Publish));
            assert!(ctx.passed(Step::Resync));
            assert_eq!(ctx.branch.as_deref(), Some("main"));
            assert_eq!(
                f.forge.releases(),
                vec![ReleaseRequest {
                    tag_name: "1.0.0".into(),
                    source_ref: "main".into(),
                    release_notes: "## 1.0.0\n\n- First stable release.\n".into(),
                    is_prerelease: false,
                }]
            );
            assert_eq!(f.repo.call_count(RepoOp::Sync), 2);

            let captured = f.logger.captured();
            assert_eq!(captured.err.first().unwrap(), "warning: THIS WILL RELEASE THE PACKAGE.");
            assert_eq!(captured.out.last().unwrap(), "Released widget 1.0.0 !");
        }

        #[test]
        fn prerelease_flag_follows_version() {
            let f = Fixture::new();
            f.pipeline().release("2.0.0-beta1", Duration::ZERO).unwrap();
            assert!(f.forge.releases()[0].is_prerelease);
        }

        #[test]
        fn failed_validation_publishes_nothing() {
            let mut f = Fixture::new();
            f.checks = checks().with_missing("README.md");
            let err = f.pipeline().release("1.0.0", Duration::ZERO).unwrap_err();

            assert!(matches!(err, PipelineError::MissingSupportFile(_)));
            assert!(f.forge.operations().is_empty());
            assert_eq!(f.repo.call_count(RepoOp::Sync), 1);
        }

        #[test]
        fn rejected_release_skips_final_sync() {
            let mut f = Fixture::new();
            f.forge = MockProvider::new("acme/widget").fail_on(FailOn::PublishRelease(
                ForgeError::ReleaseRejected("no id".into()),
            ));
            let err = f.pipeline().release("1.0.0", Duration::ZERO).unwrap_err();

            assert!(matches!(err, PipelineError::Forge(ForgeError::ReleaseRejected(_))));
            assert_eq!(f.repo.call_count(RepoOp::Sync), 1);
            assert!(matches!(
                f.forge.operations().last(),
                Some(MockOperation::PublishRelease(_))
            ));
        }
    }

    mod standalone {
        use super::*;

        #[test]
        fn show_issues_prints_header_and_entries() {
            let forge = MockProvider::new("acme/widget").with_issues(vec![issue(1)]);
            let logger = Logger::capture();
            let issues = show_issues(&forge, &logger).unwrap();

            assert_eq!(issues.len(), 1);
            assert_eq!(
                logger.captured().out,
                vec![
                    "acme/widget",
                    "",
                    "    1. Issue 1",
                    "        https://github.com/acme/widget/issues/1",
                    "",
                ]
            );
        }

        #[test]
        fn show_issues_is_silent_when_empty() {
            let forge = MockProvider::new("acme/widget");
            let logger = Logger::capture();
            assert!(show_issues(&forge, &logger).unwrap().is_empty());
            assert!(logger.captured().out.is_empty());
        }

        #[test]
        fn lint_docs_ignores_version_policy() {
            let f = Fixture::new();
            lint_docs(&f.checks, &f.logger).unwrap();
            assert_eq!(f.checks.call_count(CheckOp::LintDocs), 1);
        }

        #[test]
        fn tag_uses_changelog_as_message() {
            let f = Fixture::new();
            let version =
                tag_version(&f.repo, &f.checks, &f.config, &f.logger, "v1.1.0").unwrap();

            assert_eq!(version.as_str(), "v1.1.0");
            assert_eq!(
                f.repo.tags(),
                vec![(
                    "v1.1.0".to_string(),
                    "## 1.0.0\n\n- First stable release.\n".to_string()
                )]
            );
        }

        #[test]
        fn tag_rejects_bad_version() {
            let f = Fixture::new();
            assert!(tag_version(&f.repo, &f.checks, &f.config, &f.logger, "1.0").is_err());
            assert!(f.repo.tags().is_empty());
        }
    }
}
