use serde::Deserialize;

use oscloud_derive::PaginatedResource;

#[derive(Debug, Deserialize, PaginatedResource)]
struct SimpleResource {
    #[resource_id]
    pub id: String,
    #[allow(dead_code)]
    pub not_id: String,
}

#[derive(Debug, Deserialize, PaginatedResource)]
#[collection_name = "items"]
struct RenamedResource {
    #[resource_id]
    pub id: String,
}

#[derive(Debug, Deserialize, PaginatedResource)]
#[flat_collection]
struct FlatResource {
    #[resource_id]
    pub id: String,
}

#[test]
fn test_simple_derive() {
    use oscloud::client::PaginatedResource;

    let res = SimpleResource {
        id: "the id".into(),
        not_id: "not id".into(),
    };

    let res_id: String = res.resource_id();
    assert_eq!(&res_id, "the id");

    let json =
        r#"{"simple_resources": [{"id": "1", "not_id": "abcd"}, {"id": "2", "not_id": "dcba"}]}"#;
    let resources: <SimpleResource as PaginatedResource>::Root =
        serde_json::from_str(json).unwrap();
    let flat: Vec<SimpleResource> = resources.into();
    assert_eq!(flat.len(), 2);
}

#[test]
fn test_renamed_collection() {
    use oscloud::client::PaginatedResource;

    let res = RenamedResource { id: "the id".into() };

    let res_id: String = res.resource_id();
    assert_eq!(&res_id, "the id");

    let json = r#"{"items": [{"id": "1"}, {"id": "2"}]}"#;
    let resources: <RenamedResource as PaginatedResource>::Root =
        serde_json::from_str(json).unwrap();
    let flat: Vec<RenamedResource> = resources.into();
    assert_eq!(flat.len(), 2);
}

#[test]
fn test_flat_collection() {
    use oscloud::client::PaginatedResource;

    let res = FlatResource { id: "the id".into() };

    let res_id: String = res.resource_id();
    assert_eq!(&res_id, "the id");

    let json = r#"[{"id": "1"}, {"id": "2"}]"#;
    let resources: <FlatResource as PaginatedResource>::Root = serde_json::from_str(json).unwrap();
    assert_eq!(resources.len(), 2);
}

#[test]
fn test_next_link() {
    use oscloud::client::{PaginatedCollection, PaginatedResource};

    let json = r#"{
        "simple_resources": [{"id": "1", "not_id": "abcd"}],
        "simple_resources_links": [
            {"href": "https://example.com/resources?marker=1", "rel": "next"},
            {"href": "https://example.com/doc", "rel": "describedby"}
        ]
    }"#;
    let resources: <SimpleResource as PaginatedResource>::Root =
        serde_json::from_str(json).unwrap();
    assert_eq!(
        resources.next_link().unwrap().as_str(),
        "https://example.com/resources?marker=1"
    );
}

#[test]
fn test_next_link_absent() {
    use oscloud::client::{PaginatedCollection, PaginatedResource};

    let json = r#"{"simple_resources": [{"id": "1", "not_id": "abcd"}]}"#;
    let resources: <SimpleResource as PaginatedResource>::Root =
        serde_json::from_str(json).unwrap();
    assert!(resources.next_link().is_none());
}
