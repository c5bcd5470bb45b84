//! Abstract Syntax Tree for condition expressions

/// AST node for condition expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Single comparison like "V5>=10"
    Single(SingleCondition),
    /// `true` or `false`
    Literal(bool),
    /// Negation (!)
    Not(Box<AstNode>),
    /// AND operation
    And(Box<AstNode>, Box<AstNode>),
    /// OR operation
    Or(Box<AstNode>, Box<AstNode>),
}

/// Single condition expression
#[derive(Debug, Clone, PartialEq)]
pub struct SingleCondition {
    pub property: Property,
    pub operator: Operator,
    pub value: i32,
}

/// Quantities a condition can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Global switch, 1 when ON (S<id>)
    Switch(i32),
    /// Global variable (V<id>)
    Variable(i32),
    /// Self switch of the running character, 1 when ON (SS<letter>)
    SelfSwitch(char),
    /// Box distance to the player (PD)
    PlayerDistance,
    /// Manhattan distance to the player (PM)
    PlayerManhattan,
    /// Region under the character (REG)
    Region,
    /// Region under the player (PREG)
    PlayerRegion,
    /// Facing direction code of the character (DIR)
    Direction,
    /// Character coordinates (X, Y)
    X,
    Y,
}

impl Property {
    /// Whether reading this property observes the player
    pub fn reads_player(&self) -> bool {
        matches!(
            self,
            Property::PlayerDistance | Property::PlayerManhattan | Property::PlayerRegion
        )
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
}

impl Operator {
    pub fn compare(self, left: i32, right: i32) -> bool {
        match self {
            Operator::Greater => left > right,
            Operator::Less => left < right,
            Operator::GreaterEqual => left >= right,
            Operator::LessEqual => left <= right,
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
        }
    }
}
