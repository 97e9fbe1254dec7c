use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Requirement, Scope, Span};
use crate::resource::ResourceKind;

// `//= require "name"` or `//= require <name>`, anywhere on a line.
static SCRIPT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"[ \t]*//=[ \t]+require[ \t]+(?:<(?P<global>[^>\s]+)>|["'](?P<local>[^"'\s]+)["'])[ \t]*(?:\r?\n)?"#,
    )
    .expect("script directive pattern is valid")
});

// `@import url("name.css")`, `@import "name.css"`, or `/*= require "name" */`.
static STYLESHEET_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"@import[ \t]+(?:url\([ \t]*["'](?P<url>[^"'\s)]+)["'][ \t]*\)|["'](?P<bare>[^"'\s]+)["'])[ \t]*;?[ \t]*(?:\r?\n)?"#,
        r#"|[ \t]*/\*=[ \t]+require[ \t]+(?:<(?P<global>[^>\s]+)>|["'](?P<local>[^"'\s]+)["'])[ \t]*\*/[ \t]*(?:\r?\n)?"#,
    ))
    .expect("stylesheet directive pattern is valid")
});

/// The directive syntax of one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveGrammar {
    Script,
    Stylesheet,
}

impl DirectiveGrammar {
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Script => Some(Self::Script),
            ResourceKind::Stylesheet => Some(Self::Stylesheet),
            ResourceKind::Unknown => None,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Script => &SCRIPT_DIRECTIVE,
            Self::Stylesheet => &STYLESHEET_DIRECTIVE,
        }
    }

    fn requirement(self, captures: &Captures<'_>) -> Option<Requirement> {
        let whole = captures.get(0)?;
        let span = Span::new(whole.start(), whole.end());
        if let Some(name) = captures.name("global") {
            return Some(Requirement::new(name.as_str(), Scope::Global, span));
        }
        if let Some(name) = captures.name("local") {
            return Some(Requirement::new(name.as_str(), Scope::Local, span));
        }
        let target = captures
            .name("url")
            .or_else(|| captures.name("bare"))?
            .as_str();
        if is_remote(target) {
            return None;
        }
        Some(Requirement::new(strip_extension(target), Scope::Local, span))
    }
}

/// Extracts the requirements of `content` in textual order.
///
/// Text that only looks like a directive is left alone.
pub fn parse_requirements(grammar: DirectiveGrammar, content: &str) -> Vec<Requirement> {
    grammar
        .pattern()
        .captures_iter(content)
        .filter_map(|captures| grammar.requirement(&captures))
        .collect()
}

fn is_remote(target: &str) -> bool {
    target.contains("://") || target.starts_with("//")
}

fn strip_extension(target: &str) -> &str {
    match target.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.contains('/') => stem,
        _ => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn directives(grammar: DirectiveGrammar, src: &str) -> Vec<(String, Scope, &str)> {
        parse_requirements(grammar, src)
            .into_iter()
            .map(|requirement| {
                (
                    requirement.name().to_owned(),
                    requirement.scope(),
                    requirement.span().source_text(src),
                )
            })
            .collect()
    }

    #[test]
    fn test_script_directives() {
        let src = "//= require \"jquery\"\nvar foo = {};//= require <OpenLayers>\n var s = 1;\n";
        let requirements = parse_requirements(DirectiveGrammar::Script, src);
        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].name(), "jquery");
        assert_eq!(requirements[0].scope(), Scope::Local);
        assert_eq!(requirements[0].span(), Span::new(0, 21));
        assert_eq!(requirements[1].name(), "openlayers");
        assert_eq!(requirements[1].scope(), Scope::Global);
        assert_eq!(requirements[1].span(), Span::new(34, 59));
    }

    #[test]
    fn test_script_directive_consumes_indentation_and_newline() {
        let src = "a();\n  \t//= require 'b'  \r\nc();";
        assert_eq!(
            directives(DirectiveGrammar::Script, src),
            vec![("b".to_owned(), Scope::Local, "  \t//= require 'b'  \r\n")]
        );
    }

    #[test_case("// require \"x\"" ; "plain line comment")]
    #[test_case("//=require \"x\"" ; "missing separator")]
    #[test_case("//= require x" ; "undelimited name")]
    #[test_case("//= require \"\"" ; "empty name")]
    #[test_case("/*= require \"x\" */" ; "stylesheet syntax")]
    fn test_malformed_script_directives_are_content(src: &str) {
        assert!(parse_requirements(DirectiveGrammar::Script, src).is_empty());
    }

    #[test]
    fn test_stylesheet_imports() {
        let src = "h1 {background:red;}\n @import url(\"something.css\")";
        let requirements = parse_requirements(DirectiveGrammar::Stylesheet, src);
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].name(), "something");
        assert_eq!(requirements[0].span(), Span::new(22, 50));
    }

    #[test]
    fn test_stylesheet_mixed_forms() {
        let src = "@import url('Reset.css');\n/*= require <grid> */\n@import \"theme.css\";\nbody {}\n@import url(\"http://cdn.example.com/x.css\");\n";
        assert_eq!(
            directives(DirectiveGrammar::Stylesheet, src),
            vec![
                ("reset".to_owned(), Scope::Local, "@import url('Reset.css');\n"),
                ("grid".to_owned(), Scope::Global, "/*= require <grid> */\n"),
                ("theme".to_owned(), Scope::Local, "@import \"theme.css\";\n"),
            ]
        );
    }

    #[test]
    fn test_stylesheet_require_comment() {
        let src = "h1 {background:red;}\n /*= require \"something\"  */";
        assert_eq!(
            directives(DirectiveGrammar::Stylesheet, src),
            vec![(
                "something".to_owned(),
                Scope::Local,
                " /*= require \"something\"  */"
            )]
        );
    }

    #[test]
    fn test_grammar_for_kind() {
        assert_eq!(
            DirectiveGrammar::for_kind(ResourceKind::Script),
            Some(DirectiveGrammar::Script)
        );
        assert_eq!(
            DirectiveGrammar::for_kind(ResourceKind::Stylesheet),
            Some(DirectiveGrammar::Stylesheet)
        );
        assert_eq!(DirectiveGrammar::for_kind(ResourceKind::Unknown), None);
    }
}
