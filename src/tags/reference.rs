/// Kinds of built asset a tag can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  /// `.css`, rendered as `<link rel="stylesheet">`.
  Stylesheet,
  /// `.js`, rendered as `<script src>`.
  Script,
}

/// A requested filename with a recognised suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetReference<'a> {
  /// Filename relative to the dist directory.
  pub filename: &'a str,
  /// Tag flavour.
  pub kind: AssetKind,
}

impl<'a> AssetReference<'a> {
  /// Classify `filename` by suffix. Suffixes are case-sensitive; anything other than
  /// `.css`/`.js` is `None`.
  pub fn classify(filename: &'a str) -> Option<Self> {
    let kind = if filename.ends_with(".css") {
      AssetKind::Stylesheet
    } else if filename.ends_with(".js") {
      AssetKind::Script
    } else {
      return None;
    };

    Some(Self { filename, kind })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognises_stylesheets_and_scripts() {
    assert_eq!(
      AssetReference::classify("app.css").map(|r| r.kind),
      Some(AssetKind::Stylesheet)
    );
    assert_eq!(
      AssetReference::classify("vendor/app.min.js").map(|r| r.kind),
      Some(AssetKind::Script)
    );
  }

  #[test]
  fn rejects_everything_else() {
    for filename in ["app.jsx", "app.css.map", "app.JS", "logo.png", "", "js"] {
      assert_eq!(AssetReference::classify(filename), None, "{filename}");
    }
  }
}
