//! Condition string parser

use crate::condition::ast::{AstNode, Operator, Property, SingleCondition};
use crate::error::{EventAiError, Result};

/// Parse a condition string into an AST
pub fn parse(condition: &str) -> Result<AstNode> {
    let condition = condition.trim();
    if condition.is_empty() {
        return Err(EventAiError::InvalidCondition(
            "Empty condition".to_string(),
        ));
    }

    let tokens = tokenize(condition)?;
    parse_tokens(&tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Condition(String),
    Not,
    And,
    Or,
    OpenParen,
    CloseParen,
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    let compact: String = current.split_whitespace().collect();
    if !compact.is_empty() {
        tokens.push(Token::Condition(compact));
    }
    current.clear();
}

fn tokenize(condition: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = condition.chars().peekable();
    let mut paren_depth = 0;

    while let Some(c) = chars.next() {
        match c {
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::OpenParen);
                paren_depth += 1;
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::CloseParen);
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(EventAiError::InvalidCondition(
                        "Unbalanced parentheses".to_string(),
                    ));
                }
            }
            '&' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::And);
            }
            '|' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Or);
            }
            // Prefix negation; "!=" inside a comparison stays part of it
            '!' if current.trim().is_empty() && chars.peek() != Some(&'=') => {
                current.clear();
                tokens.push(Token::Not);
            }
            _ => {
                current.push(c);
            }
        }
    }

    flush(&mut current, &mut tokens);

    if paren_depth != 0 {
        return Err(EventAiError::InvalidCondition(
            "Unbalanced parentheses".to_string(),
        ));
    }

    Ok(tokens)
}

/// Whether the opening parenthesis at 0 closes at the last token
fn wrapped_in_parens(tokens: &[Token]) -> bool {
    if tokens.len() < 2 || tokens[0] != Token::OpenParen {
        return false;
    }
    let mut depth = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

fn parse_tokens(tokens: &[Token]) -> Result<AstNode> {
    if tokens.is_empty() {
        return Err(EventAiError::InvalidCondition(
            "Empty token list".to_string(),
        ));
    }

    // Find the lowest precedence operator (OR has lower precedence than AND)
    let mut paren_depth = 0;
    let mut or_pos = None;
    let mut and_pos = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => paren_depth += 1,
            Token::CloseParen => paren_depth -= 1,
            Token::Or if paren_depth == 0 && or_pos.is_none() => or_pos = Some(i),
            Token::And if paren_depth == 0 && and_pos.is_none() => and_pos = Some(i),
            _ => {}
        }
    }

    // Handle OR (lowest precedence)
    if let Some(pos) = or_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(AstNode::Or(Box::new(left), Box::new(right)));
    }

    // Handle AND
    if let Some(pos) = and_pos {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(AstNode::And(Box::new(left), Box::new(right)));
    }

    // Handle negation, which binds tighter than AND
    if tokens[0] == Token::Not {
        let inner = parse_tokens(&tokens[1..])?;
        return Ok(AstNode::Not(Box::new(inner)));
    }

    // Handle parentheses
    if wrapped_in_parens(tokens) {
        return parse_tokens(&tokens[1..tokens.len() - 1]);
    }

    // Single condition
    if tokens.len() == 1 {
        if let Token::Condition(cond) = &tokens[0] {
            return parse_single_condition(cond);
        }
    }

    Err(EventAiError::InvalidCondition(format!(
        "Cannot parse tokens: {:?}",
        tokens
    )))
}

fn parse_single_condition(condition: &str) -> Result<AstNode> {
    match condition.to_ascii_lowercase().as_str() {
        "true" => return Ok(AstNode::Literal(true)),
        "false" => return Ok(AstNode::Literal(false)),
        _ => {}
    }

    // Two-character operators first so ">=" is not read as ">"
    let operators = [">=", "<=", "!=", ">", "<", "="];

    for op_str in operators {
        if let Some(pos) = condition.find(op_str) {
            let property = parse_property(&condition[..pos])?;
            let value_str = condition[pos + op_str.len()..].trim();

            let operator = match op_str {
                ">" => Operator::Greater,
                "<" => Operator::Less,
                ">=" => Operator::GreaterEqual,
                "<=" => Operator::LessEqual,
                "=" => Operator::Equal,
                "!=" => Operator::NotEqual,
                _ => unreachable!(),
            };

            let value = value_str.parse::<i32>().map_err(|_| {
                EventAiError::InvalidCondition(format!("Invalid value: {}", value_str))
            })?;

            return Ok(AstNode::Single(SingleCondition {
                property,
                operator,
                value,
            }));
        }
    }

    // A bare property is true when non-zero
    Ok(AstNode::Single(SingleCondition {
        property: parse_property(condition)?,
        operator: Operator::NotEqual,
        value: 0,
    }))
}

fn parse_property(text: &str) -> Result<Property> {
    let text = text.trim().to_ascii_uppercase();
    let property = match text.as_str() {
        "PD" => Some(Property::PlayerDistance),
        "PM" => Some(Property::PlayerManhattan),
        "REG" => Some(Property::Region),
        "PREG" => Some(Property::PlayerRegion),
        "DIR" => Some(Property::Direction),
        "X" => Some(Property::X),
        "Y" => Some(Property::Y),
        _ => None,
    };
    if let Some(property) = property {
        return Ok(property);
    }

    if let Some(letter) = text.strip_prefix("SS") {
        let mut chars = letter.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Ok(Property::SelfSwitch(c));
            }
        }
    } else if let Some(id) = text.strip_prefix('S') {
        if let Ok(id) = id.parse::<i32>() {
            return Ok(Property::Switch(id));
        }
    } else if let Some(id) = text.strip_prefix('V') {
        if let Ok(id) = id.parse::<i32>() {
            return Ok(Property::Variable(id));
        }
    }

    Err(EventAiError::InvalidCondition(format!(
        "Unknown property: {}",
        text
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_condition() {
        let ast = parse("V5>=10").unwrap();
        match ast {
            AstNode::Single(cond) => {
                assert_eq!(cond.property, Property::Variable(5));
                assert_eq!(cond.operator, Operator::GreaterEqual);
                assert_eq!(cond.value, 10);
            }
            _ => panic!("Expected single condition"),
        }
    }

    #[test]
    fn test_parse_spaces_inside_comparison() {
        assert_eq!(parse("V5 >= 10").unwrap(), parse("V5>=10").unwrap());
    }

    #[test]
    fn test_bare_property_means_non_zero() {
        let ast = parse("S3").unwrap();
        assert_eq!(
            ast,
            AstNode::Single(SingleCondition {
                property: Property::Switch(3),
                operator: Operator::NotEqual,
                value: 0,
            })
        );
    }

    #[test]
    fn test_parse_negation_and_not_equal() {
        match parse("!SSA").unwrap() {
            AstNode::Not(inner) => match *inner {
                AstNode::Single(cond) => assert_eq!(cond.property, Property::SelfSwitch('A')),
                _ => panic!("Expected single condition inside NOT"),
            },
            _ => panic!("Expected NOT"),
        }
        match parse("REG!=4").unwrap() {
            AstNode::Single(cond) => assert_eq!(cond.operator, Operator::NotEqual),
            _ => panic!("Expected single condition"),
        }
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("true").unwrap(), AstNode::Literal(true));
        assert_eq!(parse("FALSE").unwrap(), AstNode::Literal(false));
    }

    #[test]
    fn test_parse_operator_precedence() {
        // A | B & C should be parsed as A | (B & C) because OR has lower precedence
        let ast = parse("PD<=2 | S1 & S2").unwrap();
        match ast {
            AstNode::Or(_, right) => match *right {
                AstNode::And(_, _) => {}
                _ => panic!("Expected AND on right side of OR"),
            },
            _ => panic!("Expected OR condition"),
        }
    }

    #[test]
    fn test_parse_parenthesized_groups() {
        let ast = parse("(S1 | S2) & (V1=3)").unwrap();
        match ast {
            AstNode::And(left, _) => match *left {
                AstNode::Or(_, _) => {}
                _ => panic!("Expected OR inside AND"),
            },
            _ => panic!("Expected AND condition"),
        }
    }

    #[test]
    fn test_invalid_conditions() {
        assert!(parse("").is_err());
        assert!(parse("(S1").is_err());
        assert!(parse("S1)").is_err());
        assert!(parse("HP>3").is_err());
        assert!(parse("V1>=ten").is_err());
        assert!(parse("SSAB").is_err());
    }
}
