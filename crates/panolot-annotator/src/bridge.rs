//! Persistence bridge: commits drafts and reloads the rendered set.
//!
//! Commits translate validated attributes plus captured geometry into
//! wire payloads; reload is the single render path, so the picture after
//! any mutation is always whatever the backend returns. One record that
//! fails to decode is logged and skipped, never allowed to blank the
//! viewer.

use tracing::{info, warn};

use panolot_api::{ElementPayload, ElementRecord, ElementStore};
use panolot_core::{
    Entity, EntityId, LiveSettings, ProjectId, Result, SphericalPoint, ValidationError,
};
use panolot_viewer::PanoramaViewer;

use crate::projection;
use crate::reconcile::{LotAttributes, PoiAttributes};
use crate::scale_sync;

/// Whether `number` is already taken by another lot.
///
/// Checked locally before any network call; the entity being edited keeps
/// its own number.
pub fn duplicate_number(entities: &[Entity], number: &str, editing: Option<EntityId>) -> bool {
    entities.iter().any(|entity| match entity {
        Entity::Lot(lot) => lot.number == number && Some(lot.id) != editing,
        _ => false,
    })
}

/// Persists a lot draft, creating or updating depending on `editing`.
pub async fn commit_lot<S: ElementStore + ?Sized>(
    store: &S,
    project_id: ProjectId,
    entities: &[Entity],
    attrs: &LotAttributes,
    points: &[SphericalPoint],
    editing: Option<EntityId>,
) -> Result<()> {
    if duplicate_number(entities, &attrs.number, editing) {
        return Err(ValidationError::DuplicateLotNumber {
            number: attrs.number.clone(),
        }
        .into());
    }
    let payload = ElementPayload::lot(
        project_id,
        &attrs.number,
        attrs.status,
        attrs.price,
        attrs.area,
        attrs.stroke_width,
        points,
    );
    match editing {
        Some(id) => {
            store.update(id, payload).await?;
            info!(lot = %attrs.number, id, "lot updated");
        }
        None => {
            let record = store.create(payload).await?;
            info!(lot = %attrs.number, id = record.id, "lot created");
        }
    }
    Ok(())
}

/// Persists a road draft, styled from the live settings at commit time.
pub async fn commit_road<S: ElementStore + ?Sized>(
    store: &S,
    project_id: ProjectId,
    settings: &LiveSettings,
    points: &[SphericalPoint],
    editing: Option<EntityId>,
) -> Result<()> {
    let payload = ElementPayload::road(
        project_id,
        settings.road_width,
        &settings.road_color,
        settings.road_cap,
        points,
    );
    match editing {
        Some(id) => {
            store.update(id, payload).await?;
            info!(id, "road updated");
        }
        None => {
            let record = store.create(payload).await?;
            info!(id = record.id, "road created");
        }
    }
    Ok(())
}

/// Persists a point of interest.
///
/// Edits replace the row wholesale: the old record is deleted and a fresh
/// one created, because the backend treats the geometry blob as opaque.
pub async fn commit_poi<S: ElementStore + ?Sized>(
    store: &S,
    project_id: ProjectId,
    attrs: &PoiAttributes,
    anchor: SphericalPoint,
    editing: Option<EntityId>,
) -> Result<()> {
    if let Some(id) = editing {
        store.delete(id).await?;
    }
    let payload = ElementPayload::poi(
        project_id,
        &attrs.title,
        attrs.description.as_deref(),
        anchor,
        attrs.height,
        attrs.size,
        attrs.orientation,
        &attrs.background,
        &attrs.text_color,
    );
    let record = store.create(payload).await?;
    info!(title = %attrs.title, id = record.id, replaced = ?editing, "point saved");
    Ok(())
}

/// Deletes a persisted annotation.
pub async fn remove<S: ElementStore + ?Sized>(store: &S, id: EntityId) -> Result<()> {
    store.delete(id).await?;
    info!(id, "annotation deleted");
    Ok(())
}

/// Decodes wire records, logging and skipping any that fail.
pub fn decode_records(records: &[ElementRecord]) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(records.len());
    for record in records {
        match record.decode() {
            Ok(entity) => entities.push(entity),
            Err(e) => warn!(id = record.id, error = %e, "skipping undecodable record"),
        }
    }
    entities
}

/// Replaces the viewer's marker set with a full render of `entities`,
/// snap helpers included, restyled for the current zoom.
pub fn render_entities<V: PanoramaViewer>(viewer: &mut V, entities: &[Entity]) {
    viewer.clear_markers();
    for entity in entities {
        match entity {
            Entity::Lot(lot) => {
                for marker in projection::lot_markers(lot) {
                    viewer.add_marker(marker);
                }
            }
            Entity::Road(road) => viewer.add_marker(projection::road_marker(road)),
            Entity::Poi(poi) => viewer.add_marker(projection::poi_marker(poi)),
        }
        for snap in projection::snap_markers(entity) {
            viewer.add_marker(snap);
        }
    }
    scale_sync::restyle_all(viewer, entities);
}

/// Fetches the project's annotations and rebuilds the full marker set,
/// returning the decoded set for the machine's snapshot.
pub async fn reload<S, V>(store: &S, viewer: &mut V, project_id: ProjectId) -> Result<Vec<Entity>>
where
    S: ElementStore + ?Sized,
    V: PanoramaViewer,
{
    let records = store.list(project_id).await?;
    let entities = decode_records(&records);
    render_entities(viewer, &entities);
    info!(
        project = project_id,
        loaded = entities.len(),
        skipped = records.len() - entities.len(),
        "annotations reloaded"
    );
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panolot_core::{Lot, LotStatus};

    fn lot(id: EntityId, number: &str) -> Entity {
        Entity::Lot(Lot {
            id,
            number: number.to_string(),
            status: LotStatus::Available,
            price: 0,
            area: 0,
            stroke_width: 4.0,
            polygon: vec![
                SphericalPoint::new(0.0, 0.0),
                SphericalPoint::new(0.1, 0.0),
                SphericalPoint::new(0.1, 0.1),
            ],
        })
    }

    #[test]
    fn duplicate_check_ignores_the_edited_lot() {
        let entities = [lot(1, "A1"), lot(2, "A2")];
        assert!(duplicate_number(&entities, "A1", None));
        assert!(!duplicate_number(&entities, "A1", Some(1)));
        assert!(duplicate_number(&entities, "A1", Some(2)));
        assert!(!duplicate_number(&entities, "A3", None));
    }
}
