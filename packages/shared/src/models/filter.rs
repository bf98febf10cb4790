use std::cmp::Ordering;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use crate::models::game::Game;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    InvalidJson { parameter: String, message: String },
    InvalidFilter(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::InvalidJson { parameter, message } => {
                write!(f, "Invalid JSON string in \"{}\" parameter: {}", parameter, message)
            }
            FilterError::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
        }
    }
}

impl std::error::Error for FilterError {}

fn invalid(message: impl Into<String>) -> FilterError {
    FilterError::InvalidFilter(message.into())
}

/// Parses a query-string parameter as JSON. Absent and empty strings mean "no filter".
fn parse_json(parameter: &str, raw: Option<&str>) -> Result<Option<Value>, FilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| FilterError::InvalidJson {
                parameter: parameter.to_string(),
                message: e.to_string(),
            }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Id,
    Title,
    Platform,
    Genre,
    Year,
    Rating,
    Picture,
}

impl GameField {
    pub fn parse(name: &str) -> Result<Self, FilterError> {
        match name {
            "id" => Ok(GameField::Id),
            "title" => Ok(GameField::Title),
            "platform" => Ok(GameField::Platform),
            "genre" => Ok(GameField::Genre),
            "year" => Ok(GameField::Year),
            "rating" => Ok(GameField::Rating),
            "picture" => Ok(GameField::Picture),
            other => Err(invalid(format!("unknown property '{}'", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameField::Id => "id",
            GameField::Title => "title",
            GameField::Platform => "platform",
            GameField::Genre => "genre",
            GameField::Year => "year",
            GameField::Rating => "rating",
            GameField::Picture => "picture",
        }
    }

    fn value<'a>(&self, game: &'a Game) -> FieldValue<'a> {
        match self {
            GameField::Id => FieldValue::Int(game.id),
            GameField::Title => FieldValue::Text(&game.title),
            GameField::Platform => game
                .platform
                .map_or(FieldValue::Missing, |p| FieldValue::Text(p.as_str())),
            GameField::Genre => FieldValue::Text(&game.genre),
            GameField::Year => FieldValue::Int(game.year),
            GameField::Rating => FieldValue::Int(game.rating),
            GameField::Picture => game
                .picture
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
    Missing,
}

impl FieldValue<'_> {
    fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Text(s) => Some(s.to_string()),
            FieldValue::Missing => None,
        }
    }

    /// Total order used by `order`: missing values sort first.
    fn sort_cmp(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
            (FieldValue::Missing, _) => Ordering::Less,
            (_, FieldValue::Missing) => Ordering::Greater,
            (FieldValue::Int(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Int(_)) => Ordering::Greater,
        }
    }
}

/// A JSON scalar from a where clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl Literal {
    fn from_value(value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::Null => Ok(Literal::Null),
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Literal::Int(i)),
                None => n
                    .as_f64()
                    .map(Literal::Number)
                    .ok_or_else(|| invalid(format!("unsupported number {}", n))),
            },
            Value::String(s) => Ok(Literal::Text(s.clone())),
            other => Err(invalid(format!("expected a scalar value, got {}", other))),
        }
    }

    /// `None` when the two values cannot be compared.
    fn compare(&self, field: &FieldValue<'_>) -> Option<Ordering> {
        match (field, self) {
            (FieldValue::Missing, Literal::Null) => Some(Ordering::Equal),
            (FieldValue::Missing, _) | (_, Literal::Null) => None,
            (FieldValue::Int(i), Literal::Int(n)) => Some(i.cmp(n)),
            (FieldValue::Int(i), Literal::Number(n)) => (*i as f64).partial_cmp(n),
            (FieldValue::Int(i), Literal::Text(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Some(i.cmp(&n)),
                Err(_) => s.trim().parse::<f64>().ok().and_then(|n| (*i as f64).partial_cmp(&n)),
            },
            (FieldValue::Text(a), Literal::Text(b)) => Some((*a).cmp(b.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Condition {
    Eq(Literal),
    Neq(Literal),
    Gt(Literal),
    Gte(Literal),
    Lt(Literal),
    Lte(Literal),
    Inq(Vec<Literal>),
    Nin(Vec<Literal>),
    Between(Literal, Literal),
    Like(Regex),
    NotLike(Regex),
    Regexp(Regex),
    Exists(bool),
}

impl Condition {
    fn parse(operator: &str, operand: &Value) -> Result<Self, FilterError> {
        let condition = match operator {
            "eq" => Condition::Eq(Literal::from_value(operand)?),
            "neq" => Condition::Neq(Literal::from_value(operand)?),
            "gt" => Condition::Gt(Literal::from_value(operand)?),
            "gte" => Condition::Gte(Literal::from_value(operand)?),
            "lt" => Condition::Lt(Literal::from_value(operand)?),
            "lte" => Condition::Lte(Literal::from_value(operand)?),
            "inq" => Condition::Inq(literal_list(operator, operand)?),
            "nin" => Condition::Nin(literal_list(operator, operand)?),
            "between" => {
                let bounds = literal_list(operator, operand)?;
                match <[Literal; 2]>::try_from(bounds) {
                    Ok([low, high]) => Condition::Between(low, high),
                    Err(_) => return Err(invalid("'between' expects exactly two values")),
                }
            }
            "like" => Condition::Like(like_pattern(operand, false)?),
            "nlike" => Condition::NotLike(like_pattern(operand, false)?),
            "ilike" => Condition::Like(like_pattern(operand, true)?),
            "nilike" => Condition::NotLike(like_pattern(operand, true)?),
            "regexp" => Condition::Regexp(regexp_pattern(operand)?),
            "exists" => match operand {
                Value::Bool(b) => Condition::Exists(*b),
                _ => return Err(invalid("'exists' expects a boolean")),
            },
            other => return Err(invalid(format!("unknown operator '{}'", other))),
        };
        Ok(condition)
    }

    fn matches(&self, value: &FieldValue<'_>) -> bool {
        let is = |literal: &Literal, wanted: &[Ordering]| {
            literal
                .compare(value)
                .is_some_and(|ordering| wanted.contains(&ordering))
        };
        match self {
            Condition::Eq(literal) => is(literal, &[Ordering::Equal]),
            Condition::Neq(literal) => !is(literal, &[Ordering::Equal]),
            Condition::Gt(literal) => is(literal, &[Ordering::Greater]),
            Condition::Gte(literal) => is(literal, &[Ordering::Greater, Ordering::Equal]),
            Condition::Lt(literal) => is(literal, &[Ordering::Less]),
            Condition::Lte(literal) => is(literal, &[Ordering::Less, Ordering::Equal]),
            Condition::Inq(literals) => literals.iter().any(|l| is(l, &[Ordering::Equal])),
            Condition::Nin(literals) => !literals.iter().any(|l| is(l, &[Ordering::Equal])),
            Condition::Between(low, high) => {
                is(low, &[Ordering::Greater, Ordering::Equal])
                    && is(high, &[Ordering::Less, Ordering::Equal])
            }
            Condition::Like(regex) | Condition::Regexp(regex) => {
                value.as_text().is_some_and(|text| regex.is_match(&text))
            }
            Condition::NotLike(regex) => !value.as_text().is_some_and(|text| regex.is_match(&text)),
            Condition::Exists(expected) => (*value != FieldValue::Missing) == *expected,
        }
    }
}

fn literal_list(operator: &str, operand: &Value) -> Result<Vec<Literal>, FilterError> {
    operand
        .as_array()
        .ok_or_else(|| invalid(format!("'{}' expects an array", operator)))?
        .iter()
        .map(Literal::from_value)
        .collect()
}

/// SQL-style pattern: `%` matches any run, `_` matches one character.
fn like_pattern(operand: &Value, case_insensitive: bool) -> Result<Regex, FilterError> {
    let pattern = operand
        .as_str()
        .ok_or_else(|| invalid("like patterns must be strings"))?;
    let mut source = String::from("^");
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| invalid(e.to_string()))
}

/// Accepts a bare expression or the `/expr/flags` form; only the `i` flag is honoured.
fn regexp_pattern(operand: &Value) -> Result<Regex, FilterError> {
    let raw = operand
        .as_str()
        .ok_or_else(|| invalid("'regexp' expects a string"))?;
    let (source, case_insensitive) = match raw.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((source, flags)) => (source, flags.contains('i')),
        None => (raw, false),
    };
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| invalid(e.to_string()))
}

#[derive(Debug, Clone)]
enum Clause {
    Field(GameField, Vec<Condition>),
    And(Vec<Where>),
    Or(Vec<Where>),
}

/// Predicate over games. The empty predicate matches everything.
#[derive(Debug, Clone, Default)]
pub struct Where {
    clauses: Vec<Clause>,
}

impl Where {
    /// Parses the `where` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match parse_json("where", raw)? {
            Some(value) => Self::from_value(&value),
            None => Ok(Where::default()),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("'where' must be an object"))?;

        let mut clauses = Vec::with_capacity(object.len());
        for (key, value) in object {
            let clause = match key.as_str() {
                "and" => Clause::And(Self::list(key, value)?),
                "or" => Clause::Or(Self::list(key, value)?),
                name => Clause::Field(GameField::parse(name)?, Self::conditions(value)?),
            };
            clauses.push(clause);
        }
        Ok(Where { clauses })
    }

    fn list(key: &str, value: &Value) -> Result<Vec<Where>, FilterError> {
        value
            .as_array()
            .ok_or_else(|| invalid(format!("'{}' expects an array", key)))?
            .iter()
            .map(Where::from_value)
            .collect()
    }

    fn conditions(value: &Value) -> Result<Vec<Condition>, FilterError> {
        match value {
            Value::Object(operators) if operators.is_empty() => {
                Err(invalid("operator object must not be empty"))
            }
            Value::Object(operators) => operators
                .iter()
                .map(|(operator, operand)| Condition::parse(operator, operand))
                .collect(),
            scalar => Ok(vec![Condition::Eq(Literal::from_value(scalar)?)]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, game: &Game) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Field(field, conditions) => {
                let value = field.value(game);
                conditions.iter().all(|condition| condition.matches(&value))
            }
            Clause::And(all) => all.iter().all(|w| w.matches(game)),
            Clause::Or(any) => any.iter().any(|w| w.matches(game)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: GameField,
    pub direction: Direction,
}

impl Order {
    fn parse(raw: &str) -> Result<Self, FilterError> {
        let mut parts = raw.split_whitespace();
        let field = GameField::parse(parts.next().unwrap_or_default())?;
        let direction = match parts.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => Direction::Asc,
            Some("DESC") => Direction::Desc,
            Some(other) => return Err(invalid(format!("unknown sort direction '{}'", other))),
        };
        if parts.next().is_some() {
            return Err(invalid(format!("malformed order '{}'", raw)));
        }
        Ok(Order { field, direction })
    }

    fn compare(&self, a: &Game, b: &Game) -> Ordering {
        let ordering = self.field.value(a).sort_cmp(&self.field.value(b));
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Field projection applied to results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    include: Vec<GameField>,
    exclude: Vec<GameField>,
}

impl Fields {
    fn from_value(value: &Value) -> Result<Self, FilterError> {
        let mut fields = Fields::default();
        match value {
            Value::Array(names) => {
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| invalid("'fields' entries must be strings"))?;
                    fields.include.push(GameField::parse(name)?);
                }
            }
            Value::Object(flags) => {
                for (name, flag) in flags {
                    let field = GameField::parse(name)?;
                    match flag.as_bool() {
                        Some(true) => fields.include.push(field),
                        Some(false) => fields.exclude.push(field),
                        None => return Err(invalid("'fields' values must be booleans")),
                    }
                }
            }
            _ => return Err(invalid("'fields' must be an object or an array")),
        }
        Ok(fields)
    }

    pub fn project(&self, game: &Game) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(game)?;
        if let Value::Object(map) = &mut value {
            if !self.include.is_empty() {
                map.retain(|key, _| self.include.iter().any(|f| f.name() == key));
            } else {
                map.retain(|key, _| !self.exclude.iter().any(|f| f.name() == key));
            }
        }
        Ok(value)
    }
}

/// Query for `find`: predicate, ordering, pagination and projection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub where_: Where,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
    pub skip: usize,
    pub fields: Option<Fields>,
}

impl Filter {
    /// Parses the `filter` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match parse_json("filter", raw)? {
            Some(value) => Self::from_value(&value),
            None => Ok(Filter::default()),
        }
    }

    /// Like `parse`, but any `where` key is dropped; used when a record is addressed by id.
    pub fn parse_excluding_where(raw: Option<&str>) -> Result<Self, FilterError> {
        match parse_json("filter", raw)? {
            Some(Value::Object(mut object)) => {
                object.remove("where");
                Self::from_value(&Value::Object(object))
            }
            Some(other) => Self::from_value(&other),
            None => Ok(Filter::default()),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        let object: &Map<String, Value> = value
            .as_object()
            .ok_or_else(|| invalid("filter must be an object"))?;

        let mut filter = Filter::default();
        for (key, value) in object {
            match key.as_str() {
                "where" => filter.where_ = Where::from_value(value)?,
                "order" => filter.order = Self::orders(value)?,
                "limit" => filter.limit = Some(Self::count(key, value)?),
                "skip" | "offset" => filter.skip = Self::count(key, value)?,
                "fields" => filter.fields = Some(Fields::from_value(value)?),
                other => return Err(invalid(format!("unknown filter key '{}'", other))),
            }
        }
        Ok(filter)
    }

    fn orders(value: &Value) -> Result<Vec<Order>, FilterError> {
        match value {
            Value::String(single) => Ok(vec![Order::parse(single)?]),
            Value::Array(many) => many
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .ok_or_else(|| invalid("'order' entries must be strings"))
                        .and_then(Order::parse)
                })
                .collect(),
            _ => Err(invalid("'order' must be a string or an array")),
        }
    }

    fn count(key: &str, value: &Value) -> Result<usize, FilterError> {
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| invalid(format!("'{}' must be a non-negative integer", key)))
    }

    /// Filters, sorts and pages `games`, which are expected in ascending id order.
    pub fn apply(&self, games: impl IntoIterator<Item = Game>) -> Vec<Game> {
        let mut matched: Vec<Game> = games
            .into_iter()
            .filter(|game| self.where_.matches(game))
            .collect();

        if !self.order.is_empty() {
            matched.sort_by(|a, b| {
                self.order
                    .iter()
                    .map(|order| order.compare(a, b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        matched
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}
