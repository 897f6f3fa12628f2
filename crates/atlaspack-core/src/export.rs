use crate::model::{Atlas, Placement};
use serde_json::{Value, json};

fn placement_value(p: &Placement) -> Value {
    json!({
        "itemId": p.id,
        "pageIndex": p.page,
        "x": p.rect.x,
        "y": p.rect.y,
        "width": p.rect.w,
        "height": p.rect.h,
        "rotated": p.rotated,
    })
}

/// Serialize the whole `Atlas` as `{ pages, meta }` (array-of-pages style).
pub fn to_json_array(atlas: &Atlas) -> Value {
    let pages_val = atlas
        .pages
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "width": p.width,
                "height": p.height,
                "occupancy": p.occupancy,
                "placements": p.placements.iter().map(placement_value).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();
    json!({"pages": pages_val, "meta": &atlas.meta})
}

/// Placements keyed by item id.
/// Shape: `{ placements: { id: { pageIndex, x, y, width, height, rotated } }, meta }`.
pub fn to_json_hash(atlas: &Atlas) -> Value {
    let mut placements = serde_json::Map::new();
    for p in atlas.placements() {
        let mut v = placement_value(p);
        if let Some(obj) = v.as_object_mut() {
            obj.remove("itemId");
        }
        placements.insert(p.id.clone(), v);
    }
    json!({ "placements": placements, "meta": &atlas.meta })
}

/// Flat list of placements in page order; no page or meta records.
pub fn to_json_list(atlas: &Atlas) -> Value {
    Value::Array(atlas.placements().map(placement_value).collect())
}
