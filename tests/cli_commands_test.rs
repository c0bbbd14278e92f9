use clap::Parser;
use club_admin::app::commands::NO_MEMBERS_IN_RANGE;
use club_admin::app::render::OutputFormat;
use club_admin::{AdminApp, ApiClient, AppError, CliConfig, HttpTransport, LocalStorage};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn app_for(
    server: &MockServer,
    output: &TempDir,
    format: OutputFormat,
) -> AdminApp<HttpTransport, LocalStorage> {
    let transport = HttpTransport::new(&server.url("/api"), Duration::from_secs(5)).unwrap();
    let storage = LocalStorage::new(output.path().to_str().unwrap());
    AdminApp::new(ApiClient::new(transport), storage, format)
}

fn parse(args: &[&str]) -> club_admin::Command {
    let mut argv = vec!["club-admin"];
    argv.extend_from_slice(args);
    CliConfig::try_parse_from(argv).unwrap().command
}

fn mock_branches(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/ramas");
        then.status(200).json_body(json!({
            "ok": true,
            "datos": [
                { "id_rama": 1, "nombre_rama": "Astronomía" },
                { "id_rama": 2, "nombre_rama": "Robótica" }
            ]
        }));
    });
}

fn mock_clubs(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/clubs");
        then.status(200).json_body(json!({
            "ok": true,
            "datos": [
                {
                    "id_club": 1,
                    "nombre": "Mirando al Cielo",
                    "id_rama": 1,
                    "descripcion": "Noches de observación mensuales",
                    "direccion": "Observatorio Municipal, Ávila",
                    "fecha_fundacion": "1998-03-14",
                    "presupuesto_anual": 450,
                    "esta_activo": true
                },
                {
                    "id_club": 2,
                    "nombre": "Bots, Tuercas y Más",
                    "id_rama": 2,
                    "descripcion": "Competiciones de robots sumo",
                    "direccion": "Polígono Sur, nave 3, Vigo",
                    "fecha_fundacion": "2012-09-01",
                    "presupuesto_anual": "1200.5",
                    "esta_activo": 0
                }
            ]
        }));
    });
}

#[tokio::test]
async fn test_club_listing_shows_branch_names() {
    let server = MockServer::start();
    mock_branches(&server);
    mock_clubs(&server);
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let text = app.run(&parse(&["clubs", "list"])).await.unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("ID"));
    assert!(lines[2].contains("Mirando al Cielo") && lines[2].contains("Astronomía"));
    assert!(lines[3].contains("Robótica") && lines[3].contains("1200.50"));
    assert!(lines[3].trim_end().ends_with("no"));
}

#[tokio::test]
async fn test_member_listing_resolves_club_names_when_not_joined() {
    let server = MockServer::start();
    mock_clubs(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/socios/club/2");
        then.status(200).json_body(json!({
            "ok": true,
            "datos": [{
                "id_socio": 11,
                "nombre": "Nerea",
                "apellido": "Ibáñez",
                "email": "nerea@bots.org",
                "id_club": 2,
                "fecha_nacimiento": "2003-02-28",
                "altura_metros": null,
                "ha_pagado_cuota": true
            }]
        }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Csv);
    let csv = app.run(&parse(&["members", "by-club", "2"])).await.unwrap();

    assert_eq!(
        csv,
        "ID,First name,Last name,Email,Birth date,Height (m),Dues paid,Club\n\
         11,Nerea,Ibáñez,nerea@bots.org,2003-02-28,,yes,\"Bots, Tuercas y Más\"\n"
    );
}

#[tokio::test]
async fn test_empty_birth_date_search_prints_notice() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/socios/rango-fecha")
            .query_param("fechaInicio", "2010-01-01")
            .query_param("fechaFin", "2011-01-01");
        then.status(200).json_body(json!({ "ok": true, "datos": [] }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let text = app
        .run(&parse(&[
            "members",
            "by-birth-date",
            "--from",
            "2010-01-01",
            "--to",
            "2011-01-01",
        ]))
        .await
        .unwrap();

    assert_eq!(text, NO_MEMBERS_IN_RANGE);
}

#[tokio::test]
async fn test_update_merges_changes_into_loaded_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/socios/11");
        then.status(200).json_body(json!({
            "ok": true,
            "datos": {
                "id_socio": 11,
                "nombre": "Nerea",
                "apellido": "Ibáñez",
                "email": "nerea@bots.org",
                "id_club": 2,
                "fecha_nacimiento": "2003-02-28",
                "altura_metros": "1.62",
                "ha_pagado_cuota": false
            }
        }));
    });
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/socios/11")
            .json_body_partial(
                r#"{"nombre":"Nerea","email":"nerea@ciencia.org","ha_pagado_cuota":true,"altura_metros":1.62}"#,
            );
        then.status(200)
            .json_body(json!({ "ok": true, "datos": null, "mensaje": "Socio actualizado" }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let text = app
        .run(&parse(&[
            "members",
            "update",
            "11",
            "--email",
            "nerea@ciencia.org",
            "--dues-paid",
            "true",
        ]))
        .await
        .unwrap();

    put.assert();
    assert_eq!(text, "Socio actualizado");
}

#[tokio::test]
async fn test_backend_rejection_surfaces_server_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/clubs");
        then.status(409)
            .json_body(json!({ "ok": false, "datos": null, "mensaje": "Ya existe un club con ese nombre" }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let result = app
        .run(&parse(&[
            "clubs",
            "create",
            "--name",
            "Mirando al Cielo",
            "--branch",
            "1",
            "--description",
            "Noches de observación mensuales",
            "--address",
            "Observatorio Municipal, Ávila",
            "--founded",
            "1998-03-14",
        ]))
        .await;

    match result {
        Err(AppError::BackendError { message }) => {
            assert_eq!(message, "Ya existe un club con ese nombre")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_incomplete_create_is_rejected_locally() {
    let server = MockServer::start();
    let post = server.mock(|when, then| {
        when.method(POST).path("/api/clubs");
        then.status(201).json_body(json!({ "ok": true }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let result = app
        .run(&parse(&["clubs", "create", "--name", "Ok"]))
        .await;

    let Err(AppError::ValidationError { fields }) = result else {
        panic!("expected validation error");
    };
    assert!(fields.iter().any(|f| f.field == "nombre"));
    assert!(fields.iter().any(|f| f.field == "fecha_fundacion"));
    post.assert_hits(0);
}

#[tokio::test]
async fn test_chart_renders_bars() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/clubs/graph");
        then.status(200).json_body(json!({
            "ok": true,
            "datos": [
                { "id_club": 1, "total": 8, "id_club_CLUB": { "nombre": "Mirando al Cielo" } },
                { "id_club": 2, "total": 2, "id_club_CLUB": { "nombre": "Bots" } }
            ]
        }));
    });
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let chart = app.run(&parse(&["chart"])).await.unwrap();

    let lines: Vec<&str> = chart.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Mirando al Cielo"));
    assert!(lines[2].starts_with("Bots"));
    assert!(lines[1].matches('█').count() > lines[2].matches('█').count());
}

#[tokio::test]
async fn test_export_clubs_writes_csv_file() {
    let server = MockServer::start();
    mock_branches(&server);
    mock_clubs(&server);
    let output = TempDir::new().unwrap();

    let app = app_for(&server, &output, OutputFormat::Table);
    let message = app.run(&parse(&["export", "clubs"])).await.unwrap();

    assert!(message.starts_with("Exported 2 clubs to "));
    let path = message.trim_start_matches("Exported 2 clubs to ");
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with("ID,Name,Description,Branch,"));
    assert!(content.contains("Mirando al Cielo"));
    assert!(content.contains("\"Bots, Tuercas y Más\""));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_backend_error() {
    let output = TempDir::new().unwrap();
    let transport = HttpTransport::new("http://127.0.0.1:1/api", Duration::from_secs(2)).unwrap();
    let app = AdminApp::new(
        ApiClient::new(transport),
        LocalStorage::new(output.path().to_str().unwrap()),
        OutputFormat::Table,
    );

    let result = app.run(&parse(&["branches", "list"])).await;

    assert!(matches!(result, Err(AppError::BackendError { .. })));
}
