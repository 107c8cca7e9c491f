//! core types for governance condition trees

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// comparison operators accepted by the governance service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// ip address falls in one of the listed CIDR ranges
    IpsInRange,
    IsEmpty,
    IsFalse,
    IsNotEmpty,
    IsTrue,
    NumEquals,
    NumGreaterThan,
    NumGreaterThanEquals,
    NumLessThan,
    NumLessThanEquals,
    NumNotEquals,
    StringEquals,
    /// glob-style pattern match
    StringMatch,
    StringNotEquals,
    StringNotMatch,
    /// value is one of a comma separated list
    StringsInList,
}

impl Operator {
    pub const ALL: [Operator; 16] = [
        Operator::IpsInRange,
        Operator::IsEmpty,
        Operator::IsFalse,
        Operator::IsNotEmpty,
        Operator::IsTrue,
        Operator::NumEquals,
        Operator::NumGreaterThan,
        Operator::NumGreaterThanEquals,
        Operator::NumLessThan,
        Operator::NumLessThanEquals,
        Operator::NumNotEquals,
        Operator::StringEquals,
        Operator::StringMatch,
        Operator::StringNotEquals,
        Operator::StringNotMatch,
        Operator::StringsInList,
    ];

    /// parse operator from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ips_in_range" => Some(Operator::IpsInRange),
            "is_empty" => Some(Operator::IsEmpty),
            "is_false" => Some(Operator::IsFalse),
            "is_not_empty" => Some(Operator::IsNotEmpty),
            "is_true" => Some(Operator::IsTrue),
            "num_equals" => Some(Operator::NumEquals),
            "num_greater_than" => Some(Operator::NumGreaterThan),
            "num_greater_than_equals" => Some(Operator::NumGreaterThanEquals),
            "num_less_than" => Some(Operator::NumLessThan),
            "num_less_than_equals" => Some(Operator::NumLessThanEquals),
            "num_not_equals" => Some(Operator::NumNotEquals),
            "string_equals" => Some(Operator::StringEquals),
            "string_match" => Some(Operator::StringMatch),
            "string_not_equals" => Some(Operator::StringNotEquals),
            "string_not_match" => Some(Operator::StringNotMatch),
            "strings_in_list" => Some(Operator::StringsInList),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::IpsInRange => "ips_in_range",
            Operator::IsEmpty => "is_empty",
            Operator::IsFalse => "is_false",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IsTrue => "is_true",
            Operator::NumEquals => "num_equals",
            Operator::NumGreaterThan => "num_greater_than",
            Operator::NumGreaterThanEquals => "num_greater_than_equals",
            Operator::NumLessThan => "num_less_than",
            Operator::NumLessThanEquals => "num_less_than_equals",
            Operator::NumNotEquals => "num_not_equals",
            Operator::StringEquals => "string_equals",
            Operator::StringMatch => "string_match",
            Operator::StringNotEquals => "string_not_equals",
            Operator::StringNotMatch => "string_not_match",
            Operator::StringsInList => "strings_in_list",
        }
    }

    /// operators that compare without a `value`
    pub fn is_zero_arity(&self) -> bool {
        matches!(
            self,
            Operator::IsEmpty | Operator::IsNotEmpty | Operator::IsTrue | Operator::IsFalse
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Operator::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown operator: '{}'", s)))
    }
}

/// a single property check: `property operator value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleProperty {
    pub description: Option<String>,
    /// resource configuration variable, e.g. "public_access_enabled"
    pub property: String,
    pub operator: Operator,
    /// always a string on the wire, even for numeric comparisons
    pub value: Option<String>,
}

impl SingleProperty {
    pub fn new(property: impl Into<String>, operator: Operator) -> Self {
        Self {
            description: None,
            property: property.into(),
            operator,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// check the fields that the type system cannot
    pub fn validate(&self) -> Result<(), String> {
        if self.property.is_empty() {
            return Err("property must not be empty".to_string());
        }
        if self.value.is_none() && !self.operator.is_zero_arity() {
            return Err(format!(
                "operator '{}' on property '{}' requires a value",
                self.operator, self.property
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SingleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} \"{}\"", self.property, self.operator, value),
            None => write!(f, "{} {}", self.property, self.operator),
        }
    }
}

/// a rule condition: a single property, or an AND/OR of single properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCondition {
    Single(SingleProperty),
    Or {
        description: Option<String>,
        conditions: Vec<SingleProperty>,
    },
    And {
        description: Option<String>,
        conditions: Vec<SingleProperty>,
    },
}

impl RuleCondition {
    pub fn single(property: SingleProperty) -> Self {
        RuleCondition::Single(property)
    }

    pub fn or(conditions: Vec<SingleProperty>) -> Self {
        RuleCondition::Or {
            description: None,
            conditions,
        }
    }

    pub fn and(conditions: Vec<SingleProperty>) -> Self {
        RuleCondition::And {
            description: None,
            conditions,
        }
    }

    pub fn with_description(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            RuleCondition::Single(p) => RuleCondition::Single(SingleProperty {
                description: text,
                ..p
            }),
            RuleCondition::Or { conditions, .. } => RuleCondition::Or {
                description: text,
                conditions,
            },
            RuleCondition::And { conditions, .. } => RuleCondition::And {
                description: text,
                conditions,
            },
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RuleCondition::Single(p) => p.description.as_deref(),
            RuleCondition::Or { description, .. } | RuleCondition::And { description, .. } => {
                description.as_deref()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            RuleCondition::Single(p) => p.validate(),
            RuleCondition::Or { conditions, .. } => {
                validate_children("or", conditions, |c| c.validate())
            }
            RuleCondition::And { conditions, .. } => {
                validate_children("and", conditions, |c| c.validate())
            }
        }
    }
}

impl From<SingleProperty> for RuleCondition {
    fn from(p: SingleProperty) -> Self {
        RuleCondition::Single(p)
    }
}

/// the required configuration of a rule: a single property, or an AND/OR of
/// full [`RuleCondition`]s (two levels of nesting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRequiredConfig {
    Single(SingleProperty),
    Or {
        description: Option<String>,
        conditions: Vec<RuleCondition>,
    },
    And {
        description: Option<String>,
        conditions: Vec<RuleCondition>,
    },
}

impl RuleRequiredConfig {
    pub fn single(property: SingleProperty) -> Self {
        RuleRequiredConfig::Single(property)
    }

    pub fn or(conditions: Vec<RuleCondition>) -> Self {
        RuleRequiredConfig::Or {
            description: None,
            conditions,
        }
    }

    pub fn and(conditions: Vec<RuleCondition>) -> Self {
        RuleRequiredConfig::And {
            description: None,
            conditions,
        }
    }

    pub fn with_description(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            RuleRequiredConfig::Single(p) => RuleRequiredConfig::Single(SingleProperty {
                description: text,
                ..p
            }),
            RuleRequiredConfig::Or { conditions, .. } => RuleRequiredConfig::Or {
                description: text,
                conditions,
            },
            RuleRequiredConfig::And { conditions, .. } => RuleRequiredConfig::And {
                description: text,
                conditions,
            },
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RuleRequiredConfig::Single(p) => p.description.as_deref(),
            RuleRequiredConfig::Or { description, .. }
            | RuleRequiredConfig::And { description, .. } => description.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            RuleRequiredConfig::Single(p) => p.validate(),
            RuleRequiredConfig::Or { conditions, .. } => {
                validate_children("or", conditions, |c| c.validate())
            }
            RuleRequiredConfig::And { conditions, .. } => {
                validate_children("and", conditions, |c| c.validate())
            }
        }
    }
}

impl From<SingleProperty> for RuleRequiredConfig {
    fn from(p: SingleProperty) -> Self {
        RuleRequiredConfig::Single(p)
    }
}

fn validate_children<T>(
    key: &str,
    children: &[T],
    validate: impl Fn(&T) -> Result<(), String>,
) -> Result<(), String> {
    if children.is_empty() {
        return Err(format!("'{}' must contain at least one condition", key));
    }
    for (i, child) in children.iter().enumerate() {
        validate(child).map_err(|e| format!("{}[{}]: {}", key, i, e))?;
    }
    Ok(())
}

fn write_group<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: &[T],
) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCondition::Single(p) => write!(f, "{}", p),
            RuleCondition::Or { conditions, .. } => write_group(f, "or", conditions),
            RuleCondition::And { conditions, .. } => write_group(f, "and", conditions),
        }
    }
}

impl fmt::Display for RuleRequiredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRequiredConfig::Single(p) => write!(f, "{}", p),
            RuleRequiredConfig::Or { conditions, .. } => write_group(f, "or", conditions),
            RuleRequiredConfig::And { conditions, .. } => write_group(f, "and", conditions),
        }
    }
}
