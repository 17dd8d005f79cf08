use crux_core::testing::AppTester;
use crux_http::protocol::{HttpResponse, HttpResult};
use serde_json::json;
use shared::capabilities::{
    BrowserOperation, LocationFix, LocationOperation, LocationOutput, PermissionStatus,
};
use shared::{App, Effect, Event, Model, NoticeKind, ScreenState, ViewState};

fn location_request(
    effects: Vec<Effect>,
) -> Option<crux_core::Request<LocationOperation>> {
    effects.into_iter().find_map(|e| match e {
        Effect::Location(request) => Some(request),
        _ => None,
    })
}

/// Submits (43.5, -116.0), answers the catalog request with `response` and
/// feeds the completion back into the app.
fn submit_and_respond(app: &AppTester<App, Effect>, model: &mut Model, response: HttpResult) {
    app.update(Event::LatitudeChanged("43.5".into()), model);
    app.update(Event::LongitudeChanged("-116.0".into()), model);
    let update = app.update(Event::SubmitCoordinates, model);

    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .expect("catalog request");

    let update = app.resolve(&mut request, response).expect("resolves");
    assert_eq!(update.events.len(), 1);
    for event in update.events {
        assert_eq!(event.name(), "catalog_response");
        app.update(event, model);
    }
}

fn http_urls(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some(request.operation.url.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn valid_coordinates_issue_one_catalog_request() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::LatitudeChanged("43.5".into()), &mut model);
    app.update(Event::LongitudeChanged("-116.0".into()), &mut model);
    let update = app.update(Event::SubmitCoordinates, &mut model);

    let urls = http_urls(&update.effects);
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://api.windy.com/webcams/api/v3/webcams?"));
    assert!(urls[0].contains("nearby=43.5%2C-116%2C50"));
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert!(model.navigation.is_loading());
}

#[test]
fn out_of_range_latitude_sets_flag_without_loading() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::LatitudeChanged("91.0".into()), &mut model);
    app.update(Event::LongitudeChanged("0.0".into()), &mut model);
    let update = app.update(Event::SubmitCoordinates, &mut model);

    assert!(http_urls(&update.effects).is_empty());
    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);

    let ViewState::LocationInput {
        latitude_error,
        longitude_error,
        is_loading,
        ..
    } = app.view(&model).state
    else {
        panic!("expected location input view");
    };
    assert!(latitude_error.is_some());
    assert!(longitude_error.is_none());
    assert!(!is_loading);
}

#[test]
fn missing_permission_requests_it_and_stays_on_input() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::UseCurrentLocation, &mut model);
    let mut request = location_request(update.effects).expect("permission check");
    assert_eq!(request.operation, LocationOperation::CheckPermission);

    let update = app
        .resolve(
            &mut request,
            LocationOutput::Permission(PermissionStatus::default()),
        )
        .expect("permission check resolves");

    let asked = update.effects.iter().any(|e| {
        matches!(e, Effect::Location(r) if r.operation == LocationOperation::RequestPermission)
    });
    assert!(asked, "should ask the shell to show the permission dialog");

    for event in update.events {
        let update = app.update(event, &mut model);
        assert!(http_urls(&update.effects).is_empty());
    }

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert!(!model.navigation.is_loading());
    assert!(model.navigation.is_awaiting_permission());
    assert!(model.navigation.notice().is_some());
}

#[test]
fn denied_permission_after_request_reports_error() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::UseCurrentLocation, &mut model);
    let mut request = location_request(update.effects).expect("permission check");
    let update = app
        .resolve(
            &mut request,
            LocationOutput::Permission(PermissionStatus::default()),
        )
        .expect("permission check resolves");
    for event in update.events {
        app.update(event, &mut model);
    }

    let update = app.update(
        Event::LocationPermissionChanged { granted: false },
        &mut model,
    );
    assert!(location_request(update.effects).is_none());
    assert_eq!(
        model.navigation.notice().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
}

#[test]
fn granted_permission_and_fix_load_catalog_for_fix() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::UseCurrentLocation, &mut model);
    let mut request = location_request(update.effects).expect("permission check");
    let update = app
        .resolve(
            &mut request,
            LocationOutput::Permission(PermissionStatus {
                fine: false,
                coarse: true,
            }),
        )
        .expect("permission check resolves");

    let mut request = location_request(update.effects).expect("last known location");
    assert!(matches!(
        request.operation,
        LocationOperation::LastKnownLocation { .. }
    ));

    let update = app
        .resolve(
            &mut request,
            LocationOutput::Fix(Some(LocationFix {
                latitude: 47.61,
                longitude: -122.33,
            })),
        )
        .expect("fix resolves");

    assert_eq!(update.events.len(), 1);
    let mut urls = Vec::new();
    for event in update.events {
        let update = app.update(event, &mut model);
        urls.extend(http_urls(&update.effects));
    }

    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("nearby=47.61%2C-122.33%2C50"));
    assert_eq!(model.navigation.form().latitude_text, "47.61");
}

#[test]
fn null_fix_is_unavailable() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::UseCurrentLocation, &mut model);
    let mut request = location_request(update.effects).expect("permission check");
    let update = app
        .resolve(
            &mut request,
            LocationOutput::Permission(PermissionStatus {
                fine: true,
                coarse: false,
            }),
        )
        .expect("permission check resolves");
    let mut request = location_request(update.effects).expect("last known location");
    let update = app
        .resolve(&mut request, LocationOutput::Fix(None))
        .expect("fix resolves");

    for event in update.events {
        let update = app.update(event, &mut model);
        assert!(http_urls(&update.effects).is_empty());
    }

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert_eq!(
        model.navigation.notice().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
}

#[test]
fn open_url_goes_to_browser_only_when_valid() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::OpenUrl {
            url: "https://www.windy.com/webcams/1".into(),
        },
        &mut model,
    );
    let opened = update.effects.iter().any(|e| {
        matches!(
            e,
            Effect::Browser(r) if r.operation == BrowserOperation::Open {
                url: "https://www.windy.com/webcams/1".into()
            }
        )
    });
    assert!(opened);

    let update = app.update(
        Event::OpenUrl {
            url: "javascript:alert(1)".into(),
        },
        &mut model,
    );
    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Browser(_))));
    assert_eq!(
        model.navigation.notice().map(|n| n.kind),
        Some(NoticeKind::Warning)
    );
}

#[test]
fn back_on_input_is_left_to_platform() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::GoBack, &mut model);
    assert!(http_urls(&update.effects).is_empty());
    assert!(app.view(&model).back_exits);
    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
}

#[test]
fn configured_endpoint_and_key_are_used() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::AppStarted {
            config: shared::catalog::CatalogConfig {
                endpoint: "https://webcams.example.org/v3/webcams".into(),
                api_key: Some("secret".into()),
            },
        },
        &mut model,
    );
    app.update(Event::LatitudeChanged("0".into()), &mut model);
    app.update(Event::LongitudeChanged("0".into()), &mut model);
    let update = app.update(Event::SubmitCoordinates, &mut model);

    let request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .expect("catalog request");

    assert!(request
        .operation
        .url
        .starts_with("https://webcams.example.org/v3/webcams?"));
    assert!(request
        .operation
        .headers
        .iter()
        .any(|h| h.name == "x-windy-api-key" && h.value == "secret"));
}

#[test]
fn catalog_response_lists_webcams_in_server_order() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let body = json!({
        "webcams": [
            { "webcamId": 3, "title": "Harbour", "location": { "city": "Boise", "country": "US" } },
            { "webcamId": 1, "title": "Ridge" },
            { "webcamId": 2, "title": "Lake" }
        ]
    });
    submit_and_respond(
        &app,
        &mut model,
        HttpResult::Ok(HttpResponse::ok().json(&body).build()),
    );

    let ScreenState::List { catalog } = model.navigation.state() else {
        panic!("expected list, got {:?}", model.navigation.state());
    };
    let ids: Vec<u64> = catalog.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(!model.navigation.is_loading());
    assert!(model.navigation.notice().is_none());

    let ViewState::List { items } = app.view(&model).state else {
        panic!("expected list view");
    };
    assert_eq!(items[0].place, "Boise, US");

    app.update(Event::SelectWebcam { id: 1 }, &mut model);
    assert_eq!(model.navigation.state().name(), "detail");

    let update = app.update(Event::GoBack, &mut model);
    assert!(http_urls(&update.effects).is_empty());
    assert_eq!(model.navigation.state().name(), "list");
}

#[test]
fn empty_catalog_response_is_an_empty_list() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    submit_and_respond(
        &app,
        &mut model,
        HttpResult::Ok(HttpResponse::ok().json(json!({ "webcams": [] })).build()),
    );

    let ScreenState::List { catalog } = model.navigation.state() else {
        panic!("expected list, got {:?}", model.navigation.state());
    };
    assert!(catalog.is_empty());
    assert!(model.navigation.notice().is_none());
}

#[test]
fn server_error_keeps_input_with_error_notice() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    submit_and_respond(
        &app,
        &mut model,
        HttpResult::Ok(HttpResponse::status(500).body("boom").build()),
    );

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert!(!model.navigation.is_loading());
    let notice = model.navigation.notice().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Error);
}

#[test]
fn undecodable_body_keeps_input_with_error_notice() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    submit_and_respond(
        &app,
        &mut model,
        HttpResult::Ok(HttpResponse::ok().body("<html>maintenance</html>").build()),
    );

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert!(!model.navigation.is_loading());
    assert_eq!(
        model.navigation.notice().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
}

#[test]
fn transport_timeout_keeps_input_with_error_notice() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    submit_and_respond(
        &app,
        &mut model,
        HttpResult::Err(crux_http::Error::Timeout),
    );

    assert_eq!(model.navigation.state(), &ScreenState::LocationInput);
    assert!(!model.navigation.is_loading());
    assert_eq!(
        model.navigation.notice().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
}
