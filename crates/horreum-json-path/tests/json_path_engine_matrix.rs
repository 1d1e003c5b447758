use horreum_json_path::{render_path, JsonPathEval, JsonPathParser, ParseError, Selector};
use serde_json::{json, Value};

fn test_data() -> Value {
    json!({
        "store": {
            "book": [
                {
                    "category": "reference",
                    "author": "Nigel Rees",
                    "title": "Sayings of the Century",
                    "price": 8.95
                },
                {
                    "category": "fiction",
                    "author": "Evelyn Waugh",
                    "title": "Sword of Honour",
                    "price": 12.99
                },
                {
                    "category": "fiction",
                    "author": "Herman Melville",
                    "title": "Moby Dick",
                    "isbn": "0-553-21311-3",
                    "price": 8.99
                },
                {
                    "category": "fiction",
                    "author": "J. R. R. Tolkien",
                    "title": "The Lord of the Rings",
                    "isbn": "0-395-19395-8",
                    "price": 22.99
                }
            ],
            "bicycle": {
                "color": "red",
                "price": 19.95
            }
        },
        "authors": ["John", "Jane", "Bob"],
        "info": {
            "name": "Test Store",
            "location": "City",
            "contacts": {
                "email": "test@store.com",
                "phone": "123-456-7890"
            }
        }
    })
}

fn eval_values(path: &str, data: &Value) -> Vec<Value> {
    let parsed =
        JsonPathParser::parse(path).unwrap_or_else(|e| panic!("parse failed for '{path}': {e}"));
    JsonPathEval::eval(&parsed, data)
        .into_iter()
        .cloned()
        .collect()
}

fn eval_paths(path: &str, data: &Value) -> Vec<String> {
    let parsed =
        JsonPathParser::parse(path).unwrap_or_else(|e| panic!("parse failed for '{path}': {e}"));
    JsonPathEval::eval_query(&parsed, data)
        .paths
        .iter()
        .map(|components| render_path(components))
        .collect()
}

#[test]
fn parser_matrix() {
    assert_eq!(JsonPathParser::parse("$").unwrap().segments.len(), 0);
    assert_eq!(
        JsonPathParser::parse("$.store.book[0].title")
            .unwrap()
            .segments
            .len(),
        4
    );
    assert_eq!(
        JsonPathParser::parse("$['store'][\"book\"]")
            .unwrap()
            .segments
            .len(),
        2
    );

    let union = JsonPathParser::parse("$.store.book[0, 3]").unwrap();
    assert_eq!(
        union.segments[2].selectors,
        vec![Selector::Index(0), Selector::Index(3)]
    );

    let slice = JsonPathParser::parse("$.authors[1:]").unwrap();
    assert_eq!(
        slice.segments[1].selectors[0],
        Selector::Slice {
            start: Some(1),
            end: None,
            step: None
        }
    );

    let recursive = JsonPathParser::parse("$..[0]").unwrap();
    assert!(recursive.segments[0].recursive);

    assert_eq!(
        JsonPathParser::parse_with_position("$."),
        Err((ParseError::UnexpectedEnd, 2))
    );
    assert_eq!(
        JsonPathParser::parse("$['a"),
        Err(ParseError::UnclosedString)
    );
    assert_eq!(
        JsonPathParser::parse("$['\\q']"),
        Err(ParseError::InvalidEscape)
    );
}

#[test]
fn member_and_index_matrix() {
    let data = test_data();

    assert_eq!(
        eval_values("$.store.book[0].title", &data),
        vec![json!("Sayings of the Century")]
    );
    assert_eq!(
        eval_paths("$.store.book[0].title", &data),
        vec!["$.store.book[0].title"]
    );
    assert_eq!(eval_values("$.authors[-1]", &data), vec![json!("Bob")]);
    assert_eq!(eval_paths("$.authors[-1]", &data), vec!["$.authors[2]"]);
    assert!(eval_values("$.authors[7]", &data).is_empty());
    assert!(eval_values("$.missing.deeper", &data).is_empty());

    assert_eq!(
        eval_values("$.store.book[0,3].author", &data),
        vec![json!("Nigel Rees"), json!("J. R. R. Tolkien")]
    );
    assert_eq!(
        eval_values("$.authors[0:2]", &data),
        vec![json!("John"), json!("Jane")]
    );
    assert_eq!(
        eval_values("$.authors[::-1]", &data),
        vec![json!("Bob"), json!("Jane"), json!("John")]
    );
    assert_eq!(
        eval_paths("$.info.*", &data),
        vec!["$.info.name", "$.info.location", "$.info.contacts"]
    );
}

#[test]
fn descendant_matrix() {
    let data = test_data();

    assert_eq!(
        eval_values("$..price", &data),
        vec![
            json!(8.95),
            json!(12.99),
            json!(8.99),
            json!(22.99),
            json!(19.95)
        ]
    );
    assert_eq!(
        eval_paths("$..email", &data),
        vec!["$.info.contacts.email"]
    );

    let all = eval_values("$..*", &data);
    assert!(all.contains(&json!("Moby Dick")));
    assert!(all.contains(&json!(19.95)));
    assert!(!all.contains(&data));

    assert!(JsonPathParser::parse("$..").is_err());
}

#[test]
fn filter_matrix() {
    let data = test_data();

    assert_eq!(
        eval_values("$.store.book[?@.price < 10].title", &data),
        vec![json!("Sayings of the Century"), json!("Moby Dick")]
    );
    assert_eq!(
        eval_paths("$.store.book[?(@.isbn)]", &data),
        vec!["$.store.book[2]", "$.store.book[3]"]
    );
    assert_eq!(
        eval_values("$.store.book[?(!@.isbn)].title", &data),
        vec![json!("Sayings of the Century"), json!("Sword of Honour")]
    );
    assert_eq!(
        eval_values("$.store.book[?(@.price < 10 && @.isbn)].title", &data),
        vec![json!("Moby Dick")]
    );
    assert_eq!(
        eval_values(
            "$.store.book[?(@.price > 20 || @.category == 'reference')].title",
            &data
        ),
        vec![json!("Sayings of the Century"), json!("The Lord of the Rings")]
    );
    assert_eq!(
        eval_values(
            "$.store.book[?(@.price > $.store.bicycle.price)].title",
            &data
        ),
        vec![json!("The Lord of the Rings")]
    );

    // a filter on an object selects among its member values
    assert_eq!(
        eval_paths("$.info[?(@ == \"City\")]", &data),
        vec!["$.info.location"]
    );
}

#[test]
fn function_matrix() {
    let data = test_data();

    assert_eq!(
        eval_values("$.store.book[?length(@.author) > 12].author", &data),
        vec![json!("Herman Melville"), json!("J. R. R. Tolkien")]
    );
    assert_eq!(
        eval_paths("$[?count(@.book[*]) == 4]", &data),
        vec!["$.store"]
    );
    assert_eq!(
        eval_values("$.store.book[?match(@.category, \"fiction\")]", &data).len(),
        3
    );
    assert!(eval_values("$.store.book[?match(@.category, \"fic\")]", &data).is_empty());
    assert_eq!(
        eval_values("$.store.book[?search(@.title, \"Lord\")].title", &data),
        vec![json!("The Lord of the Rings")]
    );
    assert_eq!(
        eval_values("$.store.book[?value(@.category) == \"reference\"].price", &data),
        vec![json!(8.95)]
    );
    assert_eq!(eval_paths("$[?length(@) == 3]", &data), vec!["$.authors", "$.info"]);
}
