// GraphQL request bodies for the repository search
use serde::Serialize;

use crate::Result;

const REPOSITORY_FIELDS: &str = "          description
          name
          nameWithOwner
          url
          owner {
            login
          }
          forkCount
          stargazers {
            totalCount
          }
          watchers {
            totalCount
          }
          homepageUrl
          licenseInfo {
            name
          }
          mentionableUsers {
            totalCount
          }
          mirrorUrl
          isMirror
          primaryLanguage {
            name
          }
          parent {
            name
          }
          createdAt
          updatedAt
";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Map<String, serde_json::Value>,
}

/// Serialized POST body for one page of results
///
/// `cursor` continues after the given edge; `None` or an empty cursor starts
/// from the first result.
pub fn build_search_body(query: &str, limit: usize, cursor: Option<&str>) -> Result<String> {
    let document = search_document(query, limit, cursor);
    let body = serde_json::to_string(&GraphQlRequest {
        query: &document,
        variables: serde_json::Map::new(),
    })?;

    Ok(body)
}

/// GraphQL document text for one page
pub fn search_document(query: &str, limit: usize, cursor: Option<&str>) -> String {
    let after = match cursor {
        Some(cursor) if !cursor.is_empty() => format!(", after: {}", string_literal(cursor)),
        _ => String::new(),
    };

    format!(
        "query SearchRepositories {{
  search(query: {}, type: REPOSITORY, first:{}{}){{
    repositoryCount
    edges {{
      cursor
      node {{
        ... on Repository {{
{}        }}
      }}
    }}
  }}
}}
",
        string_literal(query),
        limit,
        after,
        REPOSITORY_FIELDS
    )
}

/// Quote a value as a GraphQL string literal
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_of(body: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["variables"], serde_json::json!({}));
        value["query"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_first_page_has_no_cursor() {
        let body = build_search_body("lang:go", 1, None).unwrap();
        let document = document_of(&body);

        assert!(document.contains("search(query: \"lang:go\", type: REPOSITORY, first:1){"));
        assert!(!document.contains("after:"));
    }

    #[test]
    fn test_empty_cursor_is_ignored() {
        let document = search_document("lang:go", 10, Some(""));
        assert!(!document.contains("after:"));
    }

    #[test]
    fn test_cursor_clause_appended() {
        let body = build_search_body("lang:go", 50, Some("Y3Vyc29yOjEwMA==")).unwrap();
        let document = document_of(&body);

        assert!(document.contains("first:50, after: \"Y3Vyc29yOjEwMA==\"){"));
    }

    #[test]
    fn test_body_is_json_escaped() {
        let body = build_search_body("lang:go", 1, None).unwrap();

        assert!(body.starts_with("{\"query\":\"query SearchRepositories {\\n"));
        assert!(body.contains("\\\"lang:go\\\""));
        assert!(body.ends_with("\"variables\":{}}"));
    }

    #[test]
    fn test_quotes_and_backslashes_escaped() {
        let document = search_document(r#"topic:"web server" path\x"#, 5, Some("a\"b"));

        assert!(document.contains(r#"search(query: "topic:\"web server\" path\\x""#));
        assert!(document.contains(r#"after: "a\"b""#));

        // Escaped text must survive the JSON layer unchanged
        let body = build_search_body(r#"topic:"web server""#, 5, None).unwrap();
        assert!(document_of(&body).contains(r#"query: "topic:\"web server\"""#));
    }

    #[test]
    fn test_control_characters_escaped() {
        assert_eq!(string_literal("a\nb\tc"), r#""a\nb\tc""#);
        assert_eq!(string_literal("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn test_all_repository_fields_requested() {
        let document = search_document("x", 1, None);
        for field in [
            "nameWithOwner",
            "forkCount",
            "homepageUrl",
            "licenseInfo",
            "mentionableUsers",
            "mirrorUrl",
            "isMirror",
            "primaryLanguage",
            "parent",
            "createdAt",
            "updatedAt",
        ] {
            assert!(document.contains(field), "missing {}", field);
        }
    }
}
