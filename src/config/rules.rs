//! Window rules used to match windows for decoration.
//!
//! The decoration predicate consults two rules: one listing windows that should
//! never be decorated, and one listing windows that should be decorated even if
//! they draw their own decorations. See [`DecorationConfig`][1].
//!
//! [1]: super::DecorationConfig

use std::hash::{Hash, Hasher};
use std::mem;

use indexmap::set::IndexSet;

use crate::types::TiledEdges;

/// The properties of a window that a [`WindowRule`] can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowProperties<'a> {
    /// The current title of the window.
    pub title: &'a str,
    /// The current `app_id` of the window.
    pub app_id: &'a str,
    /// Whether the window is fullscreen.
    pub fullscreen: bool,
    /// The tiled edges of the window.
    pub tiled_edges: TiledEdges,
}

/// A rule that can be applied to windows.
///
/// A rule with no [`Directive::Match`] directives matches nothing. Otherwise, a window
/// matches the rule if it matches every `Match` directive, and none of the
/// [`Directive::Exclude`] directives.
#[derive(Debug, Clone, Default)]
pub struct WindowRule {
    pub(crate) directives: IndexSet<Directive>,
}

impl WindowRule {
    /// Creates an empty WindowRule, which matches nothing.
    pub fn empty() -> Self {
        Self {
            directives: IndexSet::new(),
        }
    }

    /// Creates a WindowRule with the given directives.
    pub fn new<D>(directives: D) -> Self
    where
        D: IntoIterator<Item = Directive>
    {
        Self {
            directives: directives.into_iter().collect()
        }
    }

    /// Inserts a new directive into the window rule.
    ///
    /// Since directives are compared by their parameter's kind, this
    /// replaces any existing directive on the same kind of parameter.
    pub fn insert_directive(&mut self, directive: Directive) {
        self.directives.replace(directive);
    }

    /// Whether the rule contains no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Tests whether a window with the given properties matches this rule.
    pub fn matches(&self, props: &WindowProperties<'_>) -> bool {
        let mut matched_any = false;

        for directive in &self.directives {
            match directive {
                Directive::Match(param) => {
                    if !param.holds_for(props) {
                        return false
                    }
                    matched_any = true;
                }
                Directive::Exclude(param) => {
                    if param.holds_for(props) {
                        return false
                    }
                }
            }
        }

        matched_any
    }
}

/// Directives to control what the WindowRule matches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Match on this parameter.
    Match(Parameter),
    /// Exclude anything that matches this parameter (the complement of Match).
    Exclude(Parameter),
}

/// Parameters that can be matched on.
///
/// `Parameter` implements `PartialEq` and `Eq`
/// such that if two instances are the same variant, they
/// will be equal, regardless of the contained value.
/// For example:
///
/// ```
/// use toaru_decor::config::rules::Parameter;
///
/// let lhs = Parameter::Maximized(false);
/// let rhs = Parameter::Maximized(true);
///
/// assert_eq!(lhs, rhs);
/// ```
#[derive(Debug, Clone)]
pub enum Parameter {
    /// The current title of the window.
    Title(String),
    /// The current `app_id` of the window.
    AppId(String),
    /// Whether the window is currently fullscreened.
    Fullscreen(bool),
    /// Whether the window is currently maximized (tiled on all edges).
    Maximized(bool),
    /// Whether the window is floating (not tiled on any edge).
    Floating(bool),
}

impl Parameter {
    /// Whether the parameter holds for a window with the given properties.
    pub fn holds_for(&self, props: &WindowProperties<'_>) -> bool {
        match self {
            Parameter::Title(title) => props.title == title,
            Parameter::AppId(app_id) => props.app_id == app_id,
            Parameter::Fullscreen(fs) => props.fullscreen == *fs,
            Parameter::Maximized(max) => (props.tiled_edges == TiledEdges::all()) == *max,
            Parameter::Floating(float) => props.tiled_edges.is_empty() == *float,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, rhs: &Parameter) -> bool {
        mem::discriminant(self) == mem::discriminant(rhs)
    }
}

impl Eq for Parameter {}

// implement Hash to hash the enum's discriminant, ignoring the contained value.
impl Hash for Parameter {
    fn hash<H>(&self, h: &mut H) where H: Hasher {
        mem::discriminant(self).hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props<'a>(title: &'a str, app_id: &'a str, tiled_edges: TiledEdges) -> WindowProperties<'a> {
        WindowProperties {
            title,
            app_id,
            fullscreen: false,
            tiled_edges,
        }
    }

    #[test]
    fn test_empty_rule_matches_nothing() {
        let rule = WindowRule::empty();
        assert!(!rule.matches(&props("foot", "foot", TiledEdges::empty())));
    }

    #[test]
    fn test_match_and_exclude() {
        let rule = WindowRule::new([
            Directive::Match(Parameter::AppId("firefox".into())),
            Directive::Exclude(Parameter::Maximized(true)),
        ]);

        assert!(rule.matches(&props("Mozilla Firefox", "firefox", TiledEdges::empty())));
        assert!(!rule.matches(&props("Mozilla Firefox", "firefox", TiledEdges::all())));
        assert!(!rule.matches(&props("foot", "foot", TiledEdges::empty())));
    }

    #[test]
    fn test_exclude_only_matches_nothing() {
        let rule = WindowRule::new([Directive::Exclude(Parameter::Floating(true))]);
        assert!(!rule.matches(&props("foot", "foot", TiledEdges::LEFT)));
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut rule = WindowRule::new([Directive::Match(Parameter::Title("a".into()))]);
        rule.insert_directive(Directive::Match(Parameter::Title("b".into())));

        assert_eq!(rule.directives.len(), 1);
        assert!(rule.matches(&props("b", "", TiledEdges::empty())));
        assert!(!rule.matches(&props("a", "", TiledEdges::empty())));
    }
}
