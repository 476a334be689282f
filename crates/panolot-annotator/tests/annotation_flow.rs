//! End-to-end flows through the annotation engine: drawing, committing,
//! editing, deleting and reloading against the in-memory collaborators.

use panolot_annotator::{AnnotationEngine, EditorKind, Mode};
use panolot_api::MemoryElementStore;
use panolot_core::{Entity, LotStatus, SphericalPoint};
use panolot_viewer::{MarkerId, MarkerShape, MemoryViewer, PanoramaViewer, ViewerEvent};

type Engine = AnnotationEngine<MemoryViewer, MemoryElementStore>;

fn engine_at_zoom(zoom: f64) -> Engine {
    let mut viewer = MemoryViewer::new();
    viewer.set_zoom(zoom);
    AnnotationEngine::new(viewer, MemoryElementStore::new(), 1)
}

async fn click(engine: &mut Engine, yaw: f64, pitch: f64) {
    engine
        .on_viewer_event(ViewerEvent::Click(SphericalPoint::new(yaw, pitch)))
        .await
        .unwrap();
}

/// Draws and commits a square lot numbered `number`, returning to idle.
async fn commit_square_lot(engine: &mut Engine, number: &str) {
    engine.set_mode(Some(Mode::Lot)).await.unwrap();
    click(engine, 0.0, 0.0).await;
    click(engine, 0.1, 0.0).await;
    click(engine, 0.1, 0.1).await;
    click(engine, 0.0, 0.1).await;
    engine.finish_drawing().await.unwrap();

    let mut form = engine.lot_form();
    form.number = number.to_string();
    form.price = "45.000.000".to_string();
    form.area = "5.000".to_string();
    form.status = LotStatus::Available;
    engine.submit_lot_editor(&form).await.unwrap();
}

#[tokio::test]
async fn lot_lifecycle_draw_commit_reload() {
    let mut engine = engine_at_zoom(100.0);
    engine.on_viewer_event(ViewerEvent::Ready).await.unwrap();

    commit_square_lot(&mut engine, "A1").await;

    // Back to idle with no temporary leftovers.
    assert_eq!(engine.session().mode, None);
    assert!(engine.session().draft.is_empty());
    assert!(engine.viewer().temporary_ids().is_empty());
    assert_eq!(engine.open_editor(), None);

    // The round trip preserved the attributes.
    let [Entity::Lot(lot)] = engine.entities() else {
        panic!("expected exactly one lot");
    };
    assert_eq!(lot.number, "A1");
    assert_eq!(lot.price, 45_000_000);
    assert_eq!(lot.area, 5_000);
    assert_eq!(lot.polygon.len(), 4);

    // Badge sits at the polygon's visual center.
    let badge = engine.viewer().marker(MarkerId::Badge(lot.id)).unwrap();
    let MarkerShape::Html { position, .. } = badge.shape else {
        panic!("badge must be an html marker");
    };
    assert!((position.yaw - 0.05).abs() < 1e-3);
    assert!((position.pitch - 0.05).abs() < 1e-3);

    // Snap helpers exist for each vertex, hidden while idle.
    assert_eq!(engine.viewer().snap_ids().len(), 4);
    for id in engine.viewer().snap_ids() {
        assert!(!engine.viewer().marker(id).unwrap().visible);
    }
}

#[tokio::test]
async fn duplicate_lot_number_is_rejected_locally() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;
    let creates_before = engine.viewer().len();

    engine.set_mode(Some(Mode::Lot)).await.unwrap();
    click(&mut engine, 0.5, 0.5).await;
    click(&mut engine, 0.6, 0.5).await;
    engine.finish_drawing().await.unwrap();

    let mut form = engine.lot_form();
    form.number = "A1".to_string();
    form.price = "1".to_string();
    form.area = "1".to_string();
    engine.submit_lot_editor(&form).await.unwrap();

    // Rejected before any store call: still one lot, draft kept.
    let notices = engine.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("A1"));
    assert_eq!(engine.store().create_count(), 1);
    assert_eq!(engine.store().update_count(), 0);
    assert_eq!(engine.entities().len(), 1);
    assert_eq!(engine.session().mode, Some(Mode::Lot));
    assert!(engine.viewer().len() > creates_before);
}

#[tokio::test]
async fn editing_a_lot_updates_in_place() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;
    let lot_id = engine.entities()[0].id();

    engine
        .on_viewer_event(ViewerEvent::SelectMarker(MarkerId::Badge(lot_id)))
        .await
        .unwrap();
    assert_eq!(engine.open_editor(), Some(EditorKind::Lot));

    // Prefill reflects the stored attributes.
    let mut form = engine.lot_form();
    assert_eq!(form.number, "A1");
    assert_eq!(form.price, "45.000.000");

    form.status = LotStatus::Sold;
    engine.submit_lot_editor(&form).await.unwrap();

    let [Entity::Lot(lot)] = engine.entities() else {
        panic!("expected exactly one lot");
    };
    assert_eq!(lot.id, lot_id);
    assert_eq!(lot.status, LotStatus::Sold);
    assert_eq!(engine.entities().len(), 1);
}

#[tokio::test]
async fn escape_discards_the_draft_and_restores_the_picture() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;

    engine.set_mode(Some(Mode::Road)).await.unwrap();
    // Snap helpers become visible for shape drawing.
    for id in engine.viewer().snap_ids() {
        assert!(engine.viewer().marker(id).unwrap().visible);
    }
    click(&mut engine, 0.3, 0.3).await;
    click(&mut engine, 0.4, 0.3).await;
    assert!(!engine.viewer().temporary_ids().is_empty());

    engine.cancel_draft().await.unwrap();

    assert_eq!(engine.session().mode, None);
    assert!(engine.session().draft.is_empty());
    assert!(engine.viewer().temporary_ids().is_empty());
    for id in engine.viewer().snap_ids() {
        assert!(!engine.viewer().marker(id).unwrap().visible);
    }
    // The committed lot is still rendered.
    assert_eq!(engine.entities().len(), 1);
}

#[tokio::test]
async fn snapping_a_road_onto_a_lot_vertex() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;
    let lot_id = engine.entities()[0].id();

    engine.set_mode(Some(Mode::Road)).await.unwrap();
    let snap = MarkerId::Snap {
        entity: lot_id,
        vertex: 2,
    };
    engine
        .on_viewer_event(ViewerEvent::SelectMarker(snap))
        .await
        .unwrap();
    click(&mut engine, 0.5, 0.5).await;
    engine.finish_drawing().await.unwrap();

    let road = engine
        .entities()
        .iter()
        .find_map(|e| match e {
            Entity::Road(r) => Some(r),
            _ => None,
        })
        .expect("road should be persisted");
    // First vertex is the lot corner, exactly.
    assert_eq!(road.path[0], SphericalPoint::new(0.1, 0.1));
    assert_eq!(road.path[1], SphericalPoint::new(0.5, 0.5));
}

#[tokio::test]
async fn poi_edit_replaces_the_row() {
    let mut engine = engine_at_zoom(100.0);

    engine.set_mode(Some(Mode::Poi)).await.unwrap();
    click(&mut engine, 0.2, 0.1).await;
    assert_eq!(engine.open_editor(), Some(EditorKind::Poi));
    assert!(engine.viewer().marker(MarkerId::TempPoi).is_some());

    let mut form = engine.poi_form();
    form.title = "Club House".to_string();
    form.description = "Pool and gym".to_string();
    engine.submit_poi_editor(&form).await.unwrap();

    let first_id = engine.entities()[0].id();
    assert!(engine.viewer().marker(MarkerId::TempPoi).is_none());

    // Edit it: selecting the marker re-opens the editor pre-filled.
    engine
        .on_viewer_event(ViewerEvent::SelectMarker(MarkerId::Poi(first_id)))
        .await
        .unwrap();
    let mut form = engine.poi_form();
    assert_eq!(form.title, "Club House");
    form.title = "Clubhouse".to_string();
    form.description = String::new();
    engine.submit_poi_editor(&form).await.unwrap();

    // Replaced wholesale: exactly one point remains, under a new id.
    let [Entity::Poi(poi)] = engine.entities() else {
        panic!("expected exactly one point of interest");
    };
    assert_ne!(poi.id, first_id);
    assert_eq!(poi.title, "Clubhouse");
    assert_eq!(poi.description, None);
    assert_eq!(poi.anchor, SphericalPoint::new(0.2, 0.1));
}

#[tokio::test]
async fn delete_mode_removes_the_selected_annotation() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;
    commit_square_lot(&mut engine, "A2").await;
    let victim = engine.entities()[0].id();

    engine.set_mode(Some(Mode::Delete)).await.unwrap();
    engine
        .on_viewer_event(ViewerEvent::SelectMarker(MarkerId::Polygon(victim)))
        .await
        .unwrap();
    assert_eq!(engine.open_editor(), Some(EditorKind::ConfirmDelete));

    engine.confirm_delete().await.unwrap();

    assert_eq!(engine.entities().len(), 1);
    assert!(engine.viewer().marker(MarkerId::Polygon(victim)).is_none());
    // The tool stays armed for further deletions.
    assert_eq!(engine.session().mode, Some(Mode::Delete));
}

#[tokio::test]
async fn undo_removes_exactly_one_temporary_point() {
    let mut engine = engine_at_zoom(100.0);
    engine.set_mode(Some(Mode::Lot)).await.unwrap();
    click(&mut engine, 0.0, 0.0).await;
    click(&mut engine, 0.1, 0.0).await;
    click(&mut engine, 0.1, 0.1).await;
    assert!(engine.viewer().marker(MarkerId::TempPoint(3)).is_some());

    engine.undo_last_point().await.unwrap();

    assert_eq!(engine.session().draft.points.len(), 2);
    assert!(engine.viewer().marker(MarkerId::TempPoint(3)).is_none());
    assert!(engine.viewer().marker(MarkerId::TempPoint(2)).is_some());

    // Draining the draft then undoing again is a no-op.
    engine.undo_last_point().await.unwrap();
    engine.undo_last_point().await.unwrap();
    engine.undo_last_point().await.unwrap();
    assert!(engine.session().draft.points.is_empty());
}

#[tokio::test]
async fn zoom_change_rescales_persisted_strokes() {
    let mut engine = engine_at_zoom(100.0);
    commit_square_lot(&mut engine, "A1").await;
    let lot_id = engine.entities()[0].id();

    let at_full = engine
        .viewer()
        .marker(MarkerId::Polygon(lot_id))
        .unwrap()
        .style
        .stroke_width
        .unwrap();
    assert!((at_full - 4.0).abs() < 1e-9);

    engine.viewer_mut().set_zoom(0.0);
    engine
        .on_viewer_event(ViewerEvent::ZoomUpdated(0.0))
        .await
        .unwrap();

    let zoomed_out = engine
        .viewer()
        .marker(MarkerId::Polygon(lot_id))
        .unwrap()
        .style
        .stroke_width
        .unwrap();
    // 4.0 * (0.6 + 0.4 * 0/100) = 2.4
    assert!((zoomed_out - 2.4).abs() < 1e-9);
}

#[tokio::test]
async fn expired_session_surfaces_as_a_notice_and_keeps_the_draft() {
    let mut engine = engine_at_zoom(100.0);
    engine.set_mode(Some(Mode::Road)).await.unwrap();
    click(&mut engine, 0.0, 0.0).await;
    click(&mut engine, 0.2, 0.0).await;

    engine
        .store()
        .fail_next(panolot_core::AuthError::SessionExpired.into());
    engine.finish_drawing().await.unwrap();

    let notices = engine.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].to_lowercase().contains("session"));
    assert_eq!(engine.session().draft.points.len(), 2);
}

#[tokio::test]
async fn undecodable_records_are_skipped_not_fatal() {
    use panolot_api::{ElementPayload, ElementStore};

    let store = MemoryElementStore::new();
    let good = [SphericalPoint::new(0.0, 0.0), SphericalPoint::new(0.1, 0.0)];
    store
        .create(ElementPayload::lot(1, "A1", LotStatus::Available, 0, 0, 4.0, &good))
        .await
        .unwrap();
    let mut bad = ElementPayload::lot(1, "A2", LotStatus::Available, 0, 0, 4.0, &good);
    bad.geometry = serde_json::json!("{not json");
    store.create(bad).await.unwrap();

    let mut viewer = MemoryViewer::new();
    viewer.set_zoom(100.0);
    let mut engine = AnnotationEngine::new(viewer, store, 1);
    engine.reload().await.unwrap();

    assert_eq!(engine.entities().len(), 1);
    assert!(engine.viewer().marker(MarkerId::Polygon(1)).is_some());
}
