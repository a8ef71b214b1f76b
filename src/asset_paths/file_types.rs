use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Source file families the bundler handles with distinct loader chains.
///
/// [`FileType::ALL`] is also the order rules are emitted in, so the first matching pattern
/// decides which chain a file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
  /// Images and fonts copied verbatim.
  Asset,
  /// Plain stylesheets.
  Css,
  /// Sass and SCSS sources.
  Sass,
  /// Less sources.
  Less,
  /// Stylus sources.
  Stylus,
  /// JavaScript and JSX.
  Js,
}

impl FileType {
  /// Every file type in rule order.
  pub const ALL: [FileType; 6] = [
    FileType::Asset,
    FileType::Css,
    FileType::Sass,
    FileType::Less,
    FileType::Stylus,
    FileType::Js,
  ];

  /// Regex source used as the rule's `test`. Matching is case-insensitive.
  pub fn pattern(self) -> &'static str {
    match self {
      FileType::Asset => r"\.(jpe?g|png|gif|svg|eot|ttf|woff|woff2)$",
      FileType::Css => r"\.css$",
      FileType::Sass => r"(\.scss|\.sass)$",
      FileType::Less => r"\.less$",
      FileType::Stylus => r"\.styl$",
      FileType::Js => r"\.jsx?$",
    }
  }

  /// Whether `path` belongs to this file type.
  pub fn matches(self, path: &str) -> bool {
    compiled_patterns()[self.index()].is_match(path)
  }

  /// First file type matching `path`.
  pub fn classify(path: &str) -> Option<FileType> {
    FileType::ALL.into_iter().find(|file_type| file_type.matches(path))
  }

  /// Stylesheet families that pass through the CSS loader chain.
  pub fn is_stylesheet(self) -> bool {
    matches!(
      self,
      FileType::Css | FileType::Sass | FileType::Less | FileType::Stylus
    )
  }

  fn index(self) -> usize {
    self as usize
  }
}

impl Serialize for FileType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.pattern())
  }
}

fn compiled_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      FileType::ALL
        .iter()
        .map(|file_type| {
          Regex::new(&format!("(?i){}", file_type.pattern())).expect("invalid file type regex")
        })
        .collect()
    })
    .as_slice()
}

#[cfg(test)]
mod tests {
  use super::FileType;

  #[test]
  fn classifies_by_extension() {
    assert_eq!(FileType::classify("img/logo.PNG"), Some(FileType::Asset));
    assert_eq!(FileType::classify("fonts/icons.woff2"), Some(FileType::Asset));
    assert_eq!(FileType::classify("app.css"), Some(FileType::Css));
    assert_eq!(FileType::classify("theme.scss"), Some(FileType::Sass));
    assert_eq!(FileType::classify("theme.sass"), Some(FileType::Sass));
    assert_eq!(FileType::classify("vars.less"), Some(FileType::Less));
    assert_eq!(FileType::classify("grid.styl"), Some(FileType::Stylus));
    assert_eq!(FileType::classify("main.jsx"), Some(FileType::Js));
    assert_eq!(FileType::classify("main.JS"), Some(FileType::Js));
  }

  #[test]
  fn ignores_unknown_extensions() {
    assert_eq!(FileType::classify("README.md"), None);
    assert_eq!(FileType::classify("app.ts"), None);
    assert_eq!(FileType::classify("app.css.map"), None);
  }

  #[test]
  fn serialises_as_pattern() {
    let value = serde_json::to_value(FileType::Less).unwrap();
    assert_eq!(value, serde_json::json!(r"\.less$"));
  }
}
