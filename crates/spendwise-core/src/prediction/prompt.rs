//! Prompt templates for the estimator
//!
//! Templates are markdown files with YAML frontmatter, compiled into the
//! binary. Rendering is a simple mustache-style `{{var}}` substitution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use super::PredictionRequest;
use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Embedded prompt templates
mod defaults {
    pub const PREDICT_TOTAL: &str = include_str!("../../../../prompts/predict_total.md");
    pub const ESTIMATE_DESCRIPTION: &str =
        include_str!("../../../../prompts/estimate_description.md");
}

/// Which template produced a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Next-period total from an expense list
    PredictTotal,
    /// Single amount from a free-text description
    EstimateDescription,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PredictTotal => "predict_total",
            Self::EstimateDescription => "estimate_description",
        }
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::PredictTotal => defaults::PREDICT_TOTAL,
            Self::EstimateDescription => defaults::ESTIMATE_DESCRIPTION,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    pub version: u32,
}

/// A parsed, not-yet-rendered template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub metadata: PromptMetadata,
    pub body: String,
}

impl PromptTemplate {
    /// Parse a template file (frontmatter + body)
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim();

        if !content.starts_with("---") {
            return Err(Error::InvalidData(
                "Prompt must start with YAML frontmatter (---)".into(),
            ));
        }

        let rest = &content[3..];
        let end = rest.find("---").ok_or_else(|| {
            Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
        })?;

        let metadata: PromptMetadata = serde_yaml::from_str(rest[..end].trim())?;
        let body = rest[end + 3..].trim().to_string();

        Ok(Self { metadata, body })
    }

    /// Replace every `{{key}}` with its value in a single pass
    ///
    /// Substituted values are not rescanned. Unknown keys are left as written.
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.body, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// A rendered prompt ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    kind: PromptKind,
    text: String,
}

impl Prompt {
    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Builds estimator prompts from prediction requests
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    predict_total: PromptTemplate,
    estimate_description: PromptTemplate,
}

impl PromptBuilder {
    /// Builder using the templates compiled into the binary
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            predict_total: PromptTemplate::parse(PromptKind::PredictTotal.default_content())?,
            estimate_description: PromptTemplate::parse(
                PromptKind::EstimateDescription.default_content(),
            )?,
        })
    }

    /// Render the prompt for a request
    pub fn build(&self, request: &PredictionRequest) -> Result<Prompt> {
        match request {
            PredictionRequest::ByExpenseList { expenses, .. } => self.expense_prompt(expenses),
            PredictionRequest::ByDescription { text } => self.description_prompt(text),
        }
    }

    /// Prompt asking for the next-period total of `expenses`
    pub fn expense_prompt(&self, expenses: &[ExpenseRecord]) -> Result<Prompt> {
        let total = expense_total(expenses)?;

        let items = expenses
            .iter()
            .map(|e| format!("- {}: {:.2}", e.category, e.amount))
            .collect::<Vec<_>>()
            .join("\n");

        let mut vars = HashMap::new();
        vars.insert("total", format!("{:.2}", total));
        vars.insert("count", expenses.len().to_string());
        vars.insert("items", items);

        Ok(Prompt {
            kind: PromptKind::PredictTotal,
            text: self.predict_total.render(&vars),
        })
    }

    /// Prompt asking for a single amount matching `description`
    pub fn description_prompt(&self, description: &str) -> Result<Prompt> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyInput(
                "Description is required for prediction".into(),
            ));
        }

        let mut vars = HashMap::new();
        vars.insert("description", description.to_string());

        Ok(Prompt {
            kind: PromptKind::EstimateDescription,
            text: self.estimate_description.render(&vars),
        })
    }
}

/// Sum of an expense list, rejecting empty lists and unusable amounts
pub fn expense_total(expenses: &[ExpenseRecord]) -> Result<f64> {
    if expenses.is_empty() {
        return Err(Error::EmptyInput(
            "At least one expense is required for prediction".into(),
        ));
    }

    if let Some(bad) = expenses
        .iter()
        .find(|e| !e.amount.is_finite() || e.amount < 0.0)
    {
        return Err(Error::InvalidData(format!(
            "Expense amount must be a non-negative number (got {} for {:?})",
            bad.amount, bad.title
        )));
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    if !total.is_finite() {
        return Err(Error::InvalidData(
            "Expense amounts are too large to total".into(),
        ));
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("Groceries", 120.0, "Food"),
            ExpenseRecord::new("Bus pass", 45.5, "Transport"),
        ]
    }

    #[test]
    fn test_parse_template() {
        let template = PromptTemplate::parse(
            "---\nid: sample\nversion: 3\n---\nHello {{name}}",
        )
        .unwrap();
        assert_eq!(template.metadata.id, "sample");
        assert_eq!(template.metadata.version, 3);

        let mut vars = HashMap::new();
        vars.insert("name", "world".to_string());
        assert_eq!(template.render(&vars), "Hello world");
    }

    #[test]
    fn test_parse_template_requires_frontmatter() {
        assert!(PromptTemplate::parse("Hello").is_err());
        assert!(PromptTemplate::parse("---\nid: x\nversion: 1\nHello").is_err());
    }

    #[test]
    fn test_embedded_templates_match_kinds() {
        let builder = PromptBuilder::embedded().unwrap();
        assert_eq!(builder.predict_total.metadata.id, PromptKind::PredictTotal.as_str());
        assert_eq!(
            builder.estimate_description.metadata.id,
            PromptKind::EstimateDescription.as_str()
        );
    }

    #[test]
    fn test_expense_prompt_contents() {
        let builder = PromptBuilder::embedded().unwrap();
        let prompt = builder.expense_prompt(&records()).unwrap();

        assert_eq!(prompt.kind(), PromptKind::PredictTotal);
        let text = prompt.text();
        assert!(text.contains("165.50"));
        assert!(text.contains("- Food: 120.00"));
        assert!(text.contains("- Transport: 45.50"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn test_expense_prompt_is_deterministic() {
        let builder = PromptBuilder::embedded().unwrap();
        assert_eq!(
            builder.expense_prompt(&records()).unwrap(),
            builder.expense_prompt(&records()).unwrap()
        );
    }

    #[test]
    fn test_placeholder_text_in_values_is_literal() {
        let builder = PromptBuilder::embedded().unwrap();
        let expenses = vec![
            ExpenseRecord::new("Odd", 5.0, "{{count}}"),
            ExpenseRecord::new("Odder", 7.0, "{{total}}"),
        ];

        for _ in 0..50 {
            let text = PromptBuilder::embedded()
                .unwrap()
                .expense_prompt(&expenses)
                .unwrap()
                .text()
                .to_string();
            assert!(text.contains("- {{count}}: 5.00"));
            assert!(text.contains("- {{total}}: 7.00"));
            assert_eq!(text, builder.expense_prompt(&expenses).unwrap().text());
        }
    }

    #[test]
    fn test_render_leaves_unknown_keys() {
        let template = PromptTemplate::parse("---\nid: t\nversion: 1\n---\n{{a}} {{b}}").unwrap();
        let mut vars = HashMap::new();
        vars.insert("a", "{{b}}".to_string());
        assert_eq!(template.render(&vars), "{{b}} {{b}}");
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let expenses = vec![
            ExpenseRecord::new("Big", 1e308, "Other"),
            ExpenseRecord::new("Bigger", 1e308, "Other"),
        ];
        assert!(matches!(
            expense_total(&expenses),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_empty_list_rejected() {
        let builder = PromptBuilder::embedded().unwrap();
        assert!(matches!(
            builder.expense_prompt(&[]),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let builder = PromptBuilder::embedded().unwrap();
        let mut expenses = records();
        expenses[1].amount = -3.0;
        assert!(matches!(
            builder.expense_prompt(&expenses),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_description_prompt() {
        let builder = PromptBuilder::embedded().unwrap();
        let prompt = builder.description_prompt("  weekly groceries ").unwrap();
        assert_eq!(prompt.kind(), PromptKind::EstimateDescription);
        assert!(prompt.text().contains("\"weekly groceries\""));

        assert!(matches!(
            builder.description_prompt("   "),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_build_dispatches_on_variant() {
        let builder = PromptBuilder::embedded().unwrap();
        let request = PredictionRequest::ByDescription {
            text: "taxi".into(),
        };
        assert_eq!(
            builder.build(&request).unwrap().kind(),
            PromptKind::EstimateDescription
        );
    }
}
