use atlaspack_core::prelude::*;

#[test]
fn export_json_shapes() {
    let cfg = BinPackConfig::builder()
        .with_bin_size(16, 12)
        .allow_rotation(true)
        .build();
    let items = vec![("a", 8, 8), ("tall", 3, 14)];
    let atlas = pack_layout(items, cfg).expect("pack");

    // json-array
    let ja = atlaspack_core::to_json_array(&atlas);
    let obj = ja.as_object().expect("object");
    assert!(obj.contains_key("pages"));
    assert!(obj.contains_key("meta"));
    let first = &ja["pages"][0]["placements"][0];
    for key in ["itemId", "pageIndex", "x", "y", "width", "height", "rotated"] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
    assert_eq!(ja["meta"]["app"], "atlaspack");

    // json-hash
    let jh = atlaspack_core::to_json_hash(&atlas);
    let tall = &jh["placements"]["tall"];
    assert_eq!(tall["rotated"], true);
    assert_eq!(tall["width"], 14);
    assert_eq!(tall["height"], 3);
    assert!(tall.get("itemId").is_none());

    // flat list
    let jl = atlaspack_core::to_json_list(&atlas);
    let arr = jl.as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert!(arr.iter().all(|v| v["pageIndex"] == 0));
}

#[test]
fn config_round_trips_through_serde_with_defaults() {
    let cfg: BinPackConfig =
        serde_json::from_str(r#"{"bin_width": 512, "bin_height": 256}"#).expect("parse");
    assert_eq!((cfg.bin_width, cfg.bin_height), (512, 256));
    assert!(cfg.allow_rotation);
    assert_eq!(cfg.heuristic, Heuristic::BestShortSideFit);
    assert_eq!(cfg.max_pages, None);

    let cfg: BinPackConfig = serde_json::from_str(
        r#"{"bin_width": 64, "bin_height": 64, "allow_rotation": false, "heuristic": "contactpoint"}"#,
    )
    .expect("parse");
    assert!(!cfg.allow_rotation);
    assert_eq!(cfg.heuristic, Heuristic::ContactPoint);
}
