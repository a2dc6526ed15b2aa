//! Deterministic sub-score rules derived from PR text and file paths.
//!
//! Every function here is pure. Lengths are counted in characters.

use crate::types::{PrSubmission, TicketContext};

/// Conventional-commit prefixes (matched lowercase).
pub const COMMIT_PREFIXES: [&str; 10] = [
  "feat:", "fix:", "docs:", "style:", "refactor:", "test:", "chore:", "perf:", "ci:", "build:",
];

/// Words that signal the description explains why.
pub const CONTEXT_KEYWORDS: [&str; 8] = [
  "because",
  "fixes",
  "addresses",
  "implements",
  "refactor",
  "resolves",
  "closes",
  "updates",
];

fn clamp(score: f64, min: f64, max: f64) -> f64 {
  score.max(min).min(max)
}

fn char_len(s: &str) -> usize {
  s.chars().count()
}

/// Clarity without the text-analysis call.
pub fn fallback_clarity(title: &str, description: &str) -> f64 {
  let mut score = 5.0;

  let title_len = char_len(title);
  if title_len > 10 && title_len < 100 {
    score += 2.0;
  }
  let title_lower = title.to_lowercase();
  if COMMIT_PREFIXES.iter().any(|p| title_lower.starts_with(p)) {
    score += 1.0;
  }
  if char_len(description) > 50 {
    score += 2.0;
  }

  clamp(score, 1.0, 10.0)
}

/// Context: does the description explain the change, and is the change focused.
pub fn context(description: &str, file_count: usize) -> f64 {
  if description.is_empty() {
    return 2.0;
  }

  let mut score = 5.0;
  let len = char_len(description);
  if len > 100 {
    score += 1.5;
  }
  if len > 300 {
    score += 1.0;
  }

  let lower = description.to_lowercase();
  if CONTEXT_KEYWORDS.iter().any(|k| lower.contains(k)) {
    score += 1.5;
  }

  if (1..=5).contains(&file_count) {
    score += 1.0;
  } else if file_count > 10 {
    score -= 1.0;
  }

  if COMMIT_PREFIXES.iter().any(|p| lower.contains(p)) {
    score += 0.5;
  }

  clamp(score, 1.0, 10.0)
}

/// Completeness: title, description, files, tests, docs.
pub fn completeness(submission: &PrSubmission) -> f64 {
  let mut score = 5.0;

  if char_len(&submission.title) > 10 {
    score += 1.0;
  }
  if char_len(&submission.description) > 50 {
    score += 1.0;
  }
  if !submission.files.is_empty() {
    score += 1.0;
  }

  // Explicit tests win over the filename heuristic; only one bonus applies.
  if !submission.tests.is_empty() {
    score += 2.0;
  } else if submission.files.iter().any(|f| is_test_path(&f.filename)) {
    score += 1.5;
  }

  if submission.files.iter().any(|f| is_doc_path(&f.filename)) {
    score += 1.0;
  }

  clamp(score, 1.0, 10.0)
}

/// Ticket link: 0.0 without a ticket, otherwise 5.0 plus field bonuses.
pub fn ticket_link(ticket: Option<&TicketContext>) -> f64 {
  let ticket = match ticket {
    Some(t) => t,
    None => return 0.0,
  };

  let mut score = 5.0;
  if present(&ticket.ticket_id) {
    score += 2.0;
  }
  if ticket.status.as_deref() == Some("In Progress") {
    score += 1.0;
  }
  if present(&ticket.issue_type) {
    score += 1.0;
  }
  if present(&ticket.priority) {
    score += 1.0;
  }

  clamp(score, 0.0, 10.0)
}

fn present(field: &Option<String>) -> bool {
  field.as_deref().is_some_and(|s| !s.is_empty())
}

/// `test_*.*`, `*_test.*`, or anything under a `tests/` directory.
pub fn is_test_path(path: &str) -> bool {
  let p = path.to_lowercase();
  let base = p.rsplit('/').next().unwrap_or(&p);

  let prefixed = base
    .strip_prefix("test_")
    .is_some_and(|rest| rest.contains('.'));
  let suffixed = base.find("_test.").is_some_and(|i| i > 0);
  let in_tests_dir = p.starts_with("tests/") || p.contains("/tests/");

  prefixed || suffixed || in_tests_dir
}

/// README, markdown, a `docs/` directory, or "documentation" in the path.
pub fn is_doc_path(path: &str) -> bool {
  let p = path.to_lowercase();
  p.contains("readme")
    || p.ends_with(".md")
    || p.starts_with("docs/")
    || p.contains("/docs/")
    || p.contains("documentation")
}

/// Explicit tests, or a changed file that looks like one.
pub fn has_test_files(submission: &PrSubmission) -> bool {
  !submission.tests.is_empty() || submission.files.iter().any(|f| is_test_path(&f.filename))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{FileChange, FileStatus};

  fn files(names: &[&str]) -> Vec<FileChange> {
    names
      .iter()
      .map(|n| FileChange::new(*n, FileStatus::Modified))
      .collect()
  }

  #[test]
  fn fallback_clarity_rewards_title_prefix_and_description() {
    let score = fallback_clarity(
      "feat: Add user authentication with OAuth 2.0",
      "This PR implements comprehensive OAuth 2.0 authentication with proper error handling.",
    );
    assert_eq!(score, 10.0);
    assert_eq!(fallback_clarity("fix", ""), 5.0);
  }

  #[test]
  fn fallback_clarity_title_length_bounds_are_exclusive() {
    assert_eq!(fallback_clarity(&"a".repeat(10), ""), 5.0);
    assert_eq!(fallback_clarity(&"a".repeat(11), ""), 7.0);
    assert_eq!(fallback_clarity(&"a".repeat(99), ""), 7.0);
    assert_eq!(fallback_clarity(&"a".repeat(100), ""), 5.0);
  }

  #[test]
  fn prefix_match_is_case_insensitive() {
    assert_eq!(fallback_clarity("FIX:", ""), 6.0);
  }

  #[test]
  fn empty_description_short_circuits_context() {
    assert_eq!(context("", 3), 2.0);
    assert_eq!(context("", 50), 2.0);
  }

  #[test]
  fn context_file_scope_adjustments() {
    let d = "short note";
    assert_eq!(context(d, 0), 5.0);
    assert_eq!(context(d, 1), 6.0);
    assert_eq!(context(d, 5), 6.0);
    assert_eq!(context(d, 6), 5.0);
    assert_eq!(context(d, 10), 5.0);
    assert_eq!(context(d, 11), 4.0);
  }

  #[test]
  fn context_stacks_length_keyword_and_prefix_bonuses() {
    let long = format!("fix: this resolves the login loop. {}", "x".repeat(300));
    // 5 + 1.5 + 1.0 + 1.5 + 1.0 + 0.5
    assert_eq!(context(&long, 2), 10.0);
  }

  #[test]
  fn test_path_heuristics() {
    assert!(is_test_path("test_login.py"));
    assert!(is_test_path("src/auth/test_jwt.rs"));
    assert!(is_test_path("pkg/handler_test.go"));
    assert!(is_test_path("tests/integration.rs"));
    assert!(is_test_path("server/tests/api.rs"));
    assert!(!is_test_path("test_"));
    assert!(!is_test_path("src/_test.rs"));
    assert!(!is_test_path("src/contest.rs"));
    assert!(!is_test_path("src/latest/main.rs"));
  }

  #[test]
  fn doc_path_heuristics() {
    assert!(is_doc_path("README"));
    assert!(is_doc_path("guide/CHANGELOG.md"));
    assert!(is_doc_path("docs/setup.txt"));
    assert!(is_doc_path("api/Documentation.html"));
    assert!(!is_doc_path("src/main.rs"));
  }

  #[test]
  fn explicit_tests_take_precedence_over_heuristic() {
    let mut sub = PrSubmission::new("1", "short", "");
    sub.files = files(&["test_a.py"]);
    // 5 + files 1 + heuristic 1.5
    assert_eq!(completeness(&sub), 7.5);

    sub.tests = files(&["test_a.py"]);
    // 5 + files 1 + explicit 2
    assert_eq!(completeness(&sub), 8.0);
  }

  #[test]
  fn completeness_clamps_at_ten() {
    let mut sub = PrSubmission::new(
      "1",
      "feat: a long enough title",
      "a description that is comfortably longer than fifty characters",
    );
    sub.files = files(&["src/a.rs", "README.md"]);
    sub.tests = files(&["tests/a.rs"]);
    // 5 + 1 + 1 + 1 + 2 + 1 = 11
    assert_eq!(completeness(&sub), 10.0);
  }

  #[test]
  fn ticket_link_zero_without_context() {
    assert_eq!(ticket_link(None), 0.0);
  }

  #[test]
  fn ticket_link_bonuses() {
    let empty = TicketContext::default();
    assert_eq!(ticket_link(Some(&empty)), 5.0);

    let full = TicketContext {
      ticket_id: Some("AUTH-123".into()),
      status: Some("In Progress".into()),
      issue_type: Some("Story".into()),
      priority: Some("High".into()),
    };
    assert_eq!(ticket_link(Some(&full)), 10.0);

    let other_status = TicketContext {
      ticket_id: Some("AUTH-123".into()),
      status: Some("in progress".into()),
      ..TicketContext::default()
    };
    assert_eq!(ticket_link(Some(&other_status)), 7.0);

    let blank_id = TicketContext {
      ticket_id: Some(String::new()),
      ..TicketContext::default()
    };
    assert_eq!(ticket_link(Some(&blank_id)), 5.0);
  }
}
