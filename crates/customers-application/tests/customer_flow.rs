//! End-to-end flows through the bootstrapped application.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use customers_application::{AppBootstrap, Platform, bootstrap};
use customers_core::config::CustomersConfig;
use customers_core::customer::{Customer, CustomerRepository, Field};
use customers_core::event::{AppEvent, EventKind};
use customers_core::geocoding::{Coordinate, Geocoder};
use customers_core::platform::FullCapabilities;
use customers_core::Result;
use customers_infrastructure::{ConfigService, CustomersPaths, InvariantLocalization};

/// Places only addresses on the 300 block of Pacific Ave.
struct BlockGeocoder;

#[async_trait]
impl Geocoder for BlockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>> {
        if address.starts_with("300 Pacific Ave") {
            Ok(vec![Coordinate::new(37.797, -122.401)])
        } else {
            Ok(vec![Coordinate::SENTINEL])
        }
    }
}

fn platform() -> Platform {
    Platform {
        geocoder: Arc::new(BlockGeocoder),
        capabilities: Arc::new(FullCapabilities),
        localization: Arc::new(InvariantLocalization),
    }
}

/// Writes a config with latency off so the flows run immediately.
fn write_config(dir: &TempDir) {
    let mut config = CustomersConfig::default();
    config.service.simulate_latency = false;
    ConfigService::from_paths(&CustomersPaths::new(Some(dir.path())))
        .unwrap()
        .save(&config)
        .unwrap();
}

async fn start(dir: &TempDir) -> AppBootstrap {
    write_config(dir);
    bootstrap(Some(dir.path()), platform()).await.unwrap()
}

#[tokio::test]
async fn test_first_run_seeds_300_and_reopens_identically() {
    let dir = TempDir::new().unwrap();

    let app = start(&dir).await;
    let first = app.repository.load_all().await.unwrap();
    assert_eq!(first.len(), 300);
    assert_eq!(app.customer_service.snapshot().len(), 300);
    assert!(dir.path().join("customers.json").exists());
    app.shutdown().await;

    let app = start(&dir).await;
    assert_eq!(app.repository.load_all().await.unwrap(), first);
    app.shutdown().await;
}

#[tokio::test]
async fn test_new_customer_saved_through_the_bus() {
    let dir = TempDir::new().unwrap();
    let app = start(&dir).await;

    let mut detail = app.open_detail(None);
    detail.edit(Field::FirstName, "Quill");
    detail.edit(Field::LastName, "Zebulon");
    detail.edit(Field::Street, "394 Pacific Ave");
    detail.edit(Field::City, "San Francisco");
    detail.edit(Field::State, "ca");
    detail.edit(Field::PostalCode, "94111");
    let id = detail.customer().id.clone();

    detail.request_save().unwrap();
    app.shutdown().await;

    let app = start(&dir).await;
    let stored = app.repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.state, "CA");
    assert_eq!(app.repository.load_all().await.unwrap().len(), 301);

    let hits = app
        .customer_service
        .get_items(0, 1, "quill zebulon")
        .await
        .unwrap();
    assert_eq!(hits[0].id, id);

    // The geocoder only knows the rounded block.
    let position = app.open_detail(Some(stored)).resolve_position().await;
    assert_eq!(position, Some(Coordinate::new(37.797, -122.401)));
    app.shutdown().await;
}

#[tokio::test]
async fn test_attached_detail_redraws_map_after_an_edit_is_saved() {
    let dir = TempDir::new().unwrap();
    let app = start(&dir).await;
    let original = app.repository.load_all().await.unwrap()[0].clone();

    let maps = Arc::new(Mutex::new(0));
    let sink = maps.clone();
    app.bus.subscribe(EventKind::SetupMap, move |_| *sink.lock().unwrap() += 1);

    let viewer = app.attach_detail(Some(original.clone()));
    let mut editor = app.open_detail(Some(original.clone()));
    editor.edit(Field::Street, "300 Pacific Ave");
    editor.edit(Field::City, "San Francisco");
    editor.edit(Field::State, "CA");
    editor.edit(Field::PostalCode, "94111");
    editor.request_save().unwrap();

    assert_eq!(viewer.customer().street, "300 Pacific Ave");
    assert_eq!(*maps.lock().unwrap(), 1);
    assert_eq!(
        viewer.resolve_position().await,
        Some(Coordinate::new(37.797, -122.401))
    );

    drop(viewer);
    app.shutdown().await;
    assert_eq!(app_street(&dir, &original.id).await, "300 Pacific Ave");
}

async fn app_street(dir: &TempDir, id: &str) -> String {
    let app = start(dir).await;
    let stored = app.repository.find_by_id(id).await.unwrap().unwrap();
    app.shutdown().await;
    stored.street
}

#[tokio::test]
async fn test_confirmed_delete_removes_the_record() {
    let dir = TempDir::new().unwrap();
    let app = start(&dir).await;
    let victim = app.repository.load_all().await.unwrap()[0].clone();

    let questions = Arc::new(Mutex::new(Vec::new()));
    let sink = questions.clone();
    app.bus.subscribe(EventKind::DisplayQuestion, move |event| {
        if let AppEvent::DisplayQuestion(question) = event {
            sink.lock().unwrap().push(question.clone());
        }
    });

    app.open_detail(Some(victim.clone())).request_delete();
    let question = questions.lock().unwrap().remove(0);
    question.complete(true);
    app.shutdown().await;

    let app = start(&dir).await;
    assert!(app.repository.find_by_id(&victim.id).await.unwrap().is_none());
    assert_eq!(app.customer_service.snapshot().len(), 299);
    app.shutdown().await;
}

#[tokio::test]
async fn test_invalid_save_never_reaches_the_store() {
    let dir = TempDir::new().unwrap();
    let app = start(&dir).await;

    let alerts = Arc::new(Mutex::new(Vec::new()));
    let sink = alerts.clone();
    app.bus.subscribe(EventKind::DisplayAlert, move |event| {
        if let AppEvent::DisplayAlert(alert) = event {
            sink.lock().unwrap().push(alert.title.clone());
        }
    });

    let blank_first = Customer {
        last_name: "Smith".to_string(),
        ..Customer::new()
    };
    app.bus.publish(AppEvent::SaveCustomer(blank_first.clone()));
    app.shutdown().await;

    assert_eq!(*alerts.lock().unwrap(), vec!["Invalid name!".to_string()]);

    let app = start(&dir).await;
    assert!(app.repository.find_by_id(&blank_first.id).await.unwrap().is_none());
    app.shutdown().await;
}
