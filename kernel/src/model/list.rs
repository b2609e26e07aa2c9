use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared::error::{AppError, AppResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 25;

/// Keys that steer the query instead of filtering the collection. They are
/// stripped from the parameter map before filters are interpreted.
const CONTROL_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// The space attributes a collection read may filter, sort or select on.
/// Everything else is rejected — the SQL layer only ever sees names from
/// this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceAttr {
    Name,
    OperatingHours,
    Address,
    Province,
    Postalcode,
    Tel,
    Picture,
    CreatedAt,
}

impl SpaceAttr {
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "operatingHours" => Some(Self::OperatingHours),
            "address" => Some(Self::Address),
            "province" => Some(Self::Province),
            "postalcode" => Some(Self::Postalcode),
            "tel" => Some(Self::Tel),
            "picture" => Some(Self::Picture),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::OperatingHours => "operatingHours",
            Self::Address => "address",
            Self::Province => "province",
            Self::Postalcode => "postalcode",
            Self::Tel => "tel",
            Self::Picture => "picture",
            Self::CreatedAt => "createdAt",
        }
    }

    pub fn is_timestamp(self) -> bool {
        matches!(self, Self::CreatedAt)
    }
}

/// Fixed operator allow-list. A bracketed token outside this list is not an
/// operator at all; the raw key then has to pass attribute validation on its
/// own, which keeps client input from smuggling operators in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl CompareOp {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    TextList(Vec<String>),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub attr: SpaceAttr,
    pub op: CompareOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub attr: SpaceAttr,
    pub descending: bool,
}

/// Bounded read specification for the space collection, parsed from the raw
/// request query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceListQuery {
    pub filters: Vec<FilterCondition>,
    pub select: Option<Vec<SpaceAttr>>,
    pub sort: Vec<SortSpec>,
    pub page: i64,
    pub limit: i64,
}

impl SpaceListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> AppResult<Self> {
        // Sorted keys keep the generated statement deterministic; HashMap
        // iteration order is not.
        let mut filter_keys: Vec<&String> = params
            .keys()
            .filter(|k| !CONTROL_KEYS.contains(&k.as_str()))
            .collect();
        filter_keys.sort();

        let filters = filter_keys
            .into_iter()
            .map(|key| parse_filter(key, &params[key.as_str()]))
            .collect::<AppResult<Vec<_>>>()?;

        let select = params
            .get("select")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(|name| {
                        SpaceAttr::from_wire(name).ok_or_else(|| {
                            AppError::UnprocessableEntity(format!(
                                "unknown select attribute: {name}"
                            ))
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()
            })
            .transpose()?;

        let mut sort = params
            .get("sort")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|spec| !spec.is_empty())
                    .map(parse_sort)
                    .collect::<AppResult<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();
        if sort.is_empty() {
            sort.push(SortSpec {
                attr: SpaceAttr::CreatedAt,
                descending: true,
            });
        }

        Ok(Self {
            filters,
            select,
            sort,
            page: positive_or(params.get("page"), DEFAULT_PAGE),
            limit: positive_or(params.get("limit"), DEFAULT_LIMIT),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn parse_filter(key: &str, value: &str) -> AppResult<FilterCondition> {
    let (attr_name, op) = match key.strip_suffix(']').and_then(|k| k.split_once('[')) {
        Some((attr, token)) => match CompareOp::from_token(token) {
            Some(op) => (attr, op),
            None => (key, CompareOp::Eq),
        },
        None => (key, CompareOp::Eq),
    };

    let attr = SpaceAttr::from_wire(attr_name).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("unknown filter attribute: {attr_name}"))
    })?;

    let value = match (op, attr.is_timestamp()) {
        (CompareOp::In, true) => {
            return Err(AppError::UnprocessableEntity(format!(
                "in is not supported for {}",
                attr.wire_name()
            )))
        }
        (CompareOp::In, false) => FilterValue::TextList(
            value
                .split(',')
                .map(str::trim)
                .map(str::to_string)
                .collect(),
        ),
        (_, true) => FilterValue::Timestamp(parse_timestamp(value)?),
        (_, false) => FilterValue::Text(value.to_string()),
    };

    Ok(FilterCondition { attr, op, value })
}

fn parse_sort(spec: &str) -> AppResult<SortSpec> {
    let (name, descending) = match spec.strip_prefix('-') {
        Some(name) => (name, true),
        None => (spec, false),
    };
    SpaceAttr::from_wire(name)
        .map(|attr| SortSpec { attr, descending })
        .ok_or_else(|| AppError::UnprocessableEntity(format!("unknown sort attribute: {name}")))
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDate>()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| AppError::UnprocessableEntity(format!("invalid timestamp filter: {value}")))
}

fn positive_or(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

#[derive(Debug)]
pub struct PaginatedList<T> {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    pub page: i64,
    pub limit: i64,
}

impl<T> PaginatedList<T> {
    pub fn next_page(&self) -> Option<PageDescriptor> {
        (self.page * self.limit < self.total).then(|| PageDescriptor {
            page: self.page + 1,
            limit: self.limit,
        })
    }

    pub fn prev_page(&self) -> Option<PageDescriptor> {
        (self.page > 1).then(|| PageDescriptor {
            page: self.page - 1,
            limit: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn control_keys_are_not_filters() {
        let query = SpaceListQuery::from_params(&params(&[
            ("select", "name"),
            ("sort", "province"),
            ("page", "2"),
            ("limit", "10"),
        ]))
        .unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset(), 10);
    }

    #[test]
    fn bare_key_is_an_equality_filter() {
        let query = SpaceListQuery::from_params(&params(&[("province", "Bangkok")])).unwrap();
        assert_eq!(
            query.filters,
            vec![FilterCondition {
                attr: SpaceAttr::Province,
                op: CompareOp::Eq,
                value: FilterValue::Text("Bangkok".into()),
            }]
        );
    }

    #[rstest]
    #[case("postalcode[gt]", CompareOp::Gt)]
    #[case("postalcode[gte]", CompareOp::Gte)]
    #[case("postalcode[lt]", CompareOp::Lt)]
    #[case("postalcode[lte]", CompareOp::Lte)]
    fn allow_listed_tokens_become_comparisons(#[case] key: &str, #[case] expected: CompareOp) {
        let query = SpaceListQuery::from_params(&params(&[(key, "10110")])).unwrap();
        assert_eq!(query.filters[0].op, expected);
    }

    #[test]
    fn in_token_takes_a_comma_separated_list() {
        let query =
            SpaceListQuery::from_params(&params(&[("province[in]", "Bangkok, Chiang Mai")]))
                .unwrap();
        assert_eq!(
            query.filters[0].value,
            FilterValue::TextList(vec!["Bangkok".into(), "Chiang Mai".into()])
        );
    }

    #[test]
    fn unknown_token_is_not_an_operator() {
        // `province[regex]` is no comparison; the raw key fails attribute
        // validation instead of reaching the store.
        let result = SpaceListQuery::from_params(&params(&[("province[regex]", ".*")]));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let result = SpaceListQuery::from_params(&params(&[("$where", "1")]));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn created_at_comparisons_parse_timestamps() {
        let query =
            SpaceListQuery::from_params(&params(&[("createdAt[gte]", "2024-01-01")])).unwrap();
        match &query.filters[0].value {
            FilterValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00"),
            other => panic!("expected timestamp, got {other:?}"),
        }
    }

    #[test]
    fn sort_defaults_to_created_at_descending() {
        let query = SpaceListQuery::from_params(&HashMap::new()).unwrap();
        assert_eq!(
            query.sort,
            vec![SortSpec {
                attr: SpaceAttr::CreatedAt,
                descending: true,
            }]
        );
    }

    #[test]
    fn sort_parses_descending_prefix_per_field() {
        let query =
            SpaceListQuery::from_params(&params(&[("sort", "province,-createdAt")])).unwrap();
        assert_eq!(
            query.sort,
            vec![
                SortSpec {
                    attr: SpaceAttr::Province,
                    descending: false,
                },
                SortSpec {
                    attr: SpaceAttr::CreatedAt,
                    descending: true,
                },
            ]
        );
    }

    #[test]
    fn select_list_is_validated() {
        let query = SpaceListQuery::from_params(&params(&[("select", "name,province")])).unwrap();
        assert_eq!(
            query.select,
            Some(vec![SpaceAttr::Name, SpaceAttr::Province])
        );

        let result = SpaceListQuery::from_params(&params(&[("select", "name,password")]));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[rstest]
    #[case(None, DEFAULT_PAGE)]
    #[case(Some("abc"), DEFAULT_PAGE)]
    #[case(Some("0"), DEFAULT_PAGE)]
    #[case(Some("-2"), DEFAULT_PAGE)]
    #[case(Some("3"), 3)]
    fn page_falls_back_to_default(#[case] raw: Option<&str>, #[case] expected: i64) {
        let params = raw
            .map(|v| params(&[("page", v)]))
            .unwrap_or_default();
        let query = SpaceListQuery::from_params(&params).unwrap();
        assert_eq!(query.page, expected);
    }

    #[test]
    fn page_descriptors_surround_a_middle_page() {
        let list = PaginatedList::<()> {
            total: 25,
            page: 2,
            limit: 10,
            items: Vec::new(),
        };
        assert_eq!(
            list.next_page(),
            Some(PageDescriptor { page: 3, limit: 10 })
        );
        assert_eq!(
            list.prev_page(),
            Some(PageDescriptor { page: 1, limit: 10 })
        );
    }

    #[test]
    fn page_descriptors_vanish_at_the_edges() {
        let first = PaginatedList::<()> {
            total: 25,
            page: 1,
            limit: 25,
            items: Vec::new(),
        };
        assert_eq!(first.next_page(), None);
        assert_eq!(first.prev_page(), None);

        let last = PaginatedList::<()> {
            total: 25,
            page: 3,
            limit: 10,
            items: Vec::new(),
        };
        assert_eq!(last.next_page(), None);
        assert_eq!(
            last.prev_page(),
            Some(PageDescriptor { page: 2, limit: 10 })
        );
    }
}
