//! Profile expression parsing and evaluation.
//!
//! A document's `profiles` key holds a boolean expression over profile
//! names: a plain name, a negated name (`!cloud`), or conjunctions and
//! disjunctions (`dev & local`, `dev | staging`). Mixing `&` and `|`
//! at the same parenthesis level is ambiguous and rejected eagerly
//! rather than resolved by a guessed precedence.

use crate::error::{Result, StrataError};
use crate::profiles::Profile;
use std::fmt;

/// A parsed profile expression.
///
/// # Example
///
/// ```
/// use strata_core::{Profile, ProfileExpression};
///
/// let expr = ProfileExpression::parse("dev & !cloud").unwrap();
/// let active = vec![Profile::new("dev").unwrap()];
/// assert!(expr.matches(&active));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileExpression {
    text: String,
    node: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Name(String),
    Not(Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

impl ProfileExpression {
    /// Parses an expression from its textual form.
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(StrataError::expression_syntax(text, "expression is empty"));
        }
        let mut parser = Parser {
            expression: text,
            tokens,
            pos: 0,
        };
        let node = parser.expression()?;
        if parser.pos != parser.tokens.len() {
            return Err(StrataError::expression_syntax(
                text,
                "unexpected trailing input",
            ));
        }
        Ok(Self {
            text: text.to_string(),
            node,
        })
    }

    /// Combines several expressions into a single disjunction.
    ///
    /// Used for list-valued `profiles` keys, where each element is an
    /// alternative.
    pub fn any(expressions: Vec<ProfileExpression>) -> Result<Self> {
        match expressions.len() {
            0 => Err(StrataError::expression_syntax("", "expression is empty")),
            1 => Ok(expressions.into_iter().next().unwrap_or_else(|| unreachable!())),
            _ => {
                let text = expressions
                    .iter()
                    .map(|e| e.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" | ");
                let node = Node::Or(expressions.into_iter().map(|e| e.node).collect());
                Ok(Self { text, node })
            },
        }
    }

    /// Evaluates the expression against a set of active profiles.
    pub fn matches(&self, active: &[Profile]) -> bool {
        eval(&self.node, &|name| active.iter().any(|p| p.as_str() == name))
    }

    /// Returns true if any subexpression negates a profile name.
    ///
    /// Negation-bearing expressions are re-checked against the final
    /// active set during assembly; purely positive matches are decided
    /// once, forward-only.
    pub fn has_negation(&self) -> bool {
        has_negation(&self.node)
    }

    /// Returns the original expression text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ProfileExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn eval(node: &Node, is_active: &dyn Fn(&str) -> bool) -> bool {
    match node {
        Node::Name(name) => is_active(name),
        Node::Not(inner) => !eval(inner, is_active),
        Node::And(operands) => operands.iter().all(|n| eval(n, is_active)),
        Node::Or(operands) => operands.iter().any(|n| eval(n, is_active)),
    }
}

fn has_negation(node: &Node) -> bool {
    match node {
        Node::Name(_) => false,
        Node::Not(_) => true,
        Node::And(operands) | Node::Or(operands) => operands.iter().any(has_negation),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut name = String::new();

    fn flush(name: &mut String, tokens: &mut Vec<Token>) {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            tokens.push(Token::Name(trimmed.to_string()));
        }
        name.clear();
    }

    for ch in text.chars() {
        let token = match ch {
            '!' => Token::Not,
            '&' => Token::And,
            '|' => Token::Or,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => {
                name.push(ch);
                continue;
            },
        };
        flush(&mut name, &mut tokens);
        tokens.push(token);
    }
    flush(&mut name, &mut tokens);

    Ok(tokens)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    /// expression := operand ((`&` operand)* | (`|` operand)*)
    ///
    /// The operator kind must be uniform within one parenthesis level.
    fn expression(&mut self) -> Result<Node> {
        let first = self.operand()?;
        let mut operands = vec![first];
        let mut operator: Option<Token> = None;

        loop {
            let current = match self.peek() {
                Some(token @ (Token::And | Token::Or)) => token.clone(),
                Some(Token::RParen) | None => break,
                Some(_) => return Err(self.error("expected '&', '|' or end of expression")),
            };

            match &operator {
                None => operator = Some(current),
                Some(op) if *op == current => {},
                Some(_) => {
                    return Err(self.error(
                        "mixed '&' and '|' without parentheses; parenthesize to disambiguate",
                    ));
                },
            }
            self.pos += 1;
            operands.push(self.operand()?);
        }

        Ok(match operator {
            None => operands.into_iter().next().unwrap_or_else(|| unreachable!()),
            Some(Token::And) => Node::And(operands),
            Some(_) => Node::Or(operands),
        })
    }

    /// operand := `!` operand | `(` expression `)` | name
    fn operand(&mut self) -> Result<Node> {
        match self.peek().cloned() {
            Some(Token::Not) => {
                self.pos += 1;
                Ok(Node::Not(Box::new(self.operand()?)))
            },
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.expression()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(inner)
                    },
                    _ => Err(self.error("missing closing parenthesis")),
                }
            },
            Some(Token::Name(name)) => {
                self.pos += 1;
                Ok(Node::Name(name))
            },
            _ => Err(self.error("expected a profile name")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn error(&self, reason: &str) -> StrataError {
        StrataError::expression_syntax(self.expression, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(names: &[&str]) -> Vec<Profile> {
        names
            .iter()
            .map(|n| Profile::new(*n).unwrap())
            .collect()
    }

    #[test]
    fn test_plain_name() {
        let expr = ProfileExpression::parse("dev").unwrap();
        assert!(expr.matches(&active(&["dev"])));
        assert!(!expr.matches(&active(&["prod"])));
        assert!(!expr.matches(&active(&[])));
        assert!(!expr.has_negation());
    }

    #[test]
    fn test_negated_name() {
        let expr = ProfileExpression::parse("!other").unwrap();
        assert!(expr.matches(&active(&[])));
        assert!(expr.matches(&active(&["dev"])));
        assert!(!expr.matches(&active(&["other"])));
        assert!(expr.has_negation());
    }

    #[test]
    fn test_conjunction() {
        let expr = ProfileExpression::parse("dev & other").unwrap();
        assert!(expr.matches(&active(&["dev", "other"])));
        assert!(!expr.matches(&active(&["dev"])));
    }

    #[test]
    fn test_disjunction() {
        let expr = ProfileExpression::parse("dev | staging").unwrap();
        assert!(expr.matches(&active(&["staging"])));
        assert!(!expr.matches(&active(&["prod"])));
    }

    #[test]
    fn test_parenthesized_mixed() {
        let expr = ProfileExpression::parse("(dev | other) & another").unwrap();
        assert!(expr.matches(&active(&["dev", "another"])));
        assert!(expr.matches(&active(&["other", "another"])));
        assert!(!expr.matches(&active(&["dev"])));
    }

    #[test]
    fn test_mixed_without_parentheses_is_rejected() {
        let err = ProfileExpression::parse("a & b | c").unwrap_err();
        assert!(err.is_expression_syntax());
        assert!(err.to_string().contains("parenthesize"));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let expr = ProfileExpression::parse("  dev &   other ").unwrap();
        assert!(expr.matches(&active(&["dev", "other"])));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(ProfileExpression::parse("").unwrap_err().is_expression_syntax());
        assert!(ProfileExpression::parse("dev &").unwrap_err().is_expression_syntax());
        assert!(ProfileExpression::parse("& dev").unwrap_err().is_expression_syntax());
        assert!(ProfileExpression::parse("!").unwrap_err().is_expression_syntax());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(ProfileExpression::parse("(dev").unwrap_err().is_expression_syntax());
        assert!(ProfileExpression::parse("dev)").unwrap_err().is_expression_syntax());
    }

    #[test]
    fn test_negated_conjunction() {
        let expr = ProfileExpression::parse("dev & !prod").unwrap();
        assert!(expr.matches(&active(&["dev"])));
        assert!(!expr.matches(&active(&["dev", "prod"])));
        assert!(expr.has_negation());
    }

    #[test]
    fn test_any_combines_as_disjunction() {
        let expr = ProfileExpression::any(vec![
            ProfileExpression::parse("dev").unwrap(),
            ProfileExpression::parse("staging").unwrap(),
        ])
        .unwrap();
        assert!(expr.matches(&active(&["staging"])));
        assert!(!expr.matches(&active(&["prod"])));
        assert_eq!(expr.as_str(), "dev | staging");
    }
}
