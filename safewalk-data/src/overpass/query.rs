//! Overpass QL rendering.

use safewalk_core::{ElementScope, QueryPredicate, SpatialQuery, TagFilter};

/// Render `query` as an Overpass QL program.
///
/// Every predicate becomes one `around` clause inside a union, so the
/// server answers with the OR of all predicates in a single round trip.
/// `out center;` asks for a centre point on ways.
///
/// # Examples
///
/// ```
/// use safewalk_core::{Coordinate, QueryPredicate, SpatialQuery};
/// use safewalk_data::render_query;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let centre = Coordinate::new(9.3157, 76.6151)?;
/// let police = QueryPredicate::equals("amenity", "police", 5_000.0)?;
/// let ql = render_query(&SpatialQuery::single(centre, police), 25);
///
/// assert!(ql.starts_with("[out:json][timeout:25];"));
/// assert!(ql.contains(r#"nw["amenity"="police"](around:5000,9.3157,76.6151);"#));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn render_query(query: &SpatialQuery, timeout_secs: u64) -> String {
    let centre = query.centre();
    let clauses: Vec<String> = query
        .predicates()
        .iter()
        .map(|predicate| {
            format!(
                "  {}{}(around:{},{},{});",
                element_keyword(predicate.scope()),
                render_filter(predicate),
                predicate.radius_metres(),
                centre.latitude(),
                centre.longitude(),
            )
        })
        .collect();

    format!(
        "[out:json][timeout:{timeout_secs}];\n(\n{}\n);\nout center;\n",
        clauses.join("\n")
    )
}

fn element_keyword(scope: ElementScope) -> &'static str {
    match scope {
        ElementScope::Nodes => "node",
        ElementScope::Ways => "way",
        ElementScope::NodesAndWays => "nw",
    }
}

fn render_filter(predicate: &QueryPredicate) -> String {
    let key = quote(predicate.key());
    match predicate.filter() {
        TagFilter::Exists => format!("[{key}]"),
        TagFilter::Equals(value) => format!("[{key}={}]", quote(value)),
        TagFilter::OneOf(values) => {
            let alternatives: Vec<String> = values.iter().map(|v| escape_regex(v)).collect();
            format!("[{key}~{}]", quote(&format!("^({})$", alternatives.join("|"))))
        }
    }
}

/// Wrap `value` in double quotes, escaping backslashes and quotes.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if "\\.^$|?*+()[]{}".contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
