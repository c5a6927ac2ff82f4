//! Operation classification of logic identifiers.

use std::borrow::Cow;

use gozer_ir::OperationKind;
use gozer_spec::ClassifyRule;

/// How a rule tests a lowercased logic identifier.
#[derive(Debug, Clone)]
pub enum Matcher {
    Predicate(fn(&str) -> bool),
    /// Every needle occurs in the identifier. No needles never match.
    ContainsAll(Vec<String>),
}

impl Matcher {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Predicate(f) => f(lowered),
            Self::ContainsAll(needles) => {
                !needles.is_empty() && needles.iter().all(|n| lowered.contains(n.as_str()))
            }
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: Cow<'static, str>,
    pub matcher: Matcher,
    pub kind: OperationKind,
}

impl Rule {
    pub fn predicate(name: &'static str, matches: fn(&str) -> bool, kind: OperationKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            matcher: Matcher::Predicate(matches),
            kind,
        }
    }
}

impl From<&ClassifyRule> for Rule {
    fn from(rule: &ClassifyRule) -> Self {
        let needles: Vec<String> = rule.contains.iter().map(|n| n.to_lowercase()).collect();
        Self {
            name: Cow::Owned(needles.join("+")),
            matcher: Matcher::ContainsAll(needles),
            kind: rule.operation,
        }
    }
}

/// Rules in evaluation order; the first match wins.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::predicate(
            "create",
            |s| s.contains("create") || s.contains("add"),
            OperationKind::Create,
        ),
        Rule::predicate(
            "delete",
            |s| s.contains("del") || s.contains("remove"),
            OperationKind::Delete,
        ),
        Rule::predicate(
            "update",
            |s| s.contains("update") || s.contains("edit"),
            OperationKind::Update,
        ),
        Rule::predicate(
            "get-by-id",
            |s| s.contains("get") && s.contains("byid"),
            OperationKind::GetById,
        ),
        Rule::predicate(
            "get-list",
            |s| s.contains("get") && s.contains("list"),
            OperationKind::GetList,
        ),
    ]
}

/// Maps logic identifiers to an [`OperationKind`].
///
/// Identifiers matching no rule are [`OperationKind::Custom`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// The default rules, preceded by the configured ones in their order.
    pub fn from_config(rules: &[ClassifyRule]) -> Self {
        rules
            .iter()
            .enumerate()
            .fold(Self::new(), |classifier, (index, rule)| {
                classifier.insert(index, rule.into())
            })
    }

    /// Insert a rule at `index`, shifting later rules back.
    pub fn insert(mut self, index: usize, rule: Rule) -> Self {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
        self
    }

    pub fn classify(&self, identifier: &str) -> OperationKind {
        let lowered = identifier.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map(|rule| rule.kind)
            .unwrap_or(OperationKind::Custom)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
