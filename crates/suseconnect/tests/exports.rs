mod common;

use common::{capture_logs, emit_native_log, full_library, reset, with_ledger};
use serde_json::{json, Value};
use suseconnect::log_bridge;
use suseconnect::{ClientParams, Connect, Error, Product};

fn connect() -> Connect {
    Connect::from_library(full_library()).with_params(ClientParams {
        url: Some("https://smt.example.com".into()),
        debug: true,
        ..ClientParams::default()
    })
}

fn sent_params(call: usize) -> Value {
    with_ledger(|l| serde_json::from_str(&l.args[call][0]).unwrap())
}

#[test]
fn announce_system_returns_login() {
    reset(Some(br#"{"credentials":["SCC_abc","s3cret",""]}"#));
    let creds = connect().announce_system(Some("sle-15-x86_64")).unwrap();
    assert_eq!(creds.login, "SCC_abc");
    assert_eq!(creds.password, "s3cret");
    assert_eq!(
        sent_params(0),
        json!({"url": "https://smt.example.com", "debug": "true"})
    );
    with_ledger(|l| {
        assert_eq!(l.args[0][1], "sle-15-x86_64");
        assert_eq!(l.freed, l.returned);
    });
}

#[test]
fn announce_system_api_error() {
    reset(Some(
        br#"{"err_type":"APIError","message":"Unknown Registration Code.","code":401}"#,
    ));
    match connect().announce_system(None).unwrap_err() {
        Error::Api { code, message } => {
            assert_eq!(code, 401);
            assert_eq!(message, "Unknown Registration Code.");
        }
        other => panic!("unexpected: {other:?}"),
    }
    with_ledger(|l| assert_eq!(l.args[0][1], ""));
}

#[test]
fn announce_system_without_password_is_decode_error() {
    reset(Some(br#"{"credentials":["SCC_abc"]}"#));
    let err = connect().announce_system(None).unwrap_err();
    assert!(
        matches!(err, Error::Decode { export: "announce_system", .. }),
        "unexpected: {err:?}"
    );
    assert!(err.to_string().contains("lacks login or password"));
    with_ledger(|l| assert_eq!(l.freed, l.returned));
}

#[test]
fn credentials_file_errors() {
    reset(Some(
        br#"{"err_type":"MissingCredentialsFile","message":"credentials file is missing","code":0}"#,
    ));
    let err = connect().global_credentials().unwrap_err();
    assert!(matches!(err, Error::MissingCredentials { .. }));
    with_ledger(|l| {
        assert_eq!(l.args[0], vec!["/etc/zypp/credentials.d/SCCcredentials".to_string()]);
        assert_eq!(l.freed.len(), 1);
    });
}

#[test]
fn credentials_decode() {
    reset(Some(
        br#"{"file":"/etc/zypp/credentials.d/SCCcredentials","username":"SCC_1","password":"pw","system_token":""}"#,
    ));
    let creds = connect().credentials("/etc/zypp/credentials.d/SCCcredentials").unwrap();
    assert_eq!(creds.username, "SCC_1");
    assert_eq!(creds.password, "pw");
}

#[test]
fn create_credentials_file_accepts_empty_answer() {
    reset(Some(b""));
    connect()
        .create_credentials_file("SCC_1", "pw", "tok", "/tmp/creds")
        .unwrap();
    with_ledger(|l| assert_eq!(l.args[0], vec!["SCC_1", "pw", "tok", "/tmp/creds"]));
}

#[test]
fn show_product_sends_query() {
    reset(Some(
        br#"{"identifier":"sle-module-basesystem","version":"15.5","arch":"x86_64","isbase":false,"free":true,"extensions":[]}"#,
    ));
    let query = Product::new("sle-module-basesystem", "15.5", "x86_64");
    let product = connect().show_product(&query).unwrap();
    assert_eq!(product.identifier, "sle-module-basesystem");
    assert_eq!(product.extra.get("free"), Some(&json!(true)));
    let sent: Value = with_ledger(|l| serde_json::from_str(&l.args[0][1]).unwrap());
    assert_eq!(
        sent,
        json!({"identifier": "sle-module-basesystem", "version": "15.5", "arch": "x86_64"})
    );
}

#[test]
fn ssl_error_from_activation() {
    reset(Some(
        br#"{"err_type":"SSLError","message":"x509: certificate signed by unknown authority","code":19,"data":"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n"}"#,
    ));
    let err = connect()
        .activate_product(&Product::new("SLES", "15.5", "x86_64"), "admin@example.com")
        .unwrap_err();
    assert!(matches!(err, Error::Ssl { code: 19, certificate: Some(_), .. }));
    with_ledger(|l| assert_eq!(l.args[0][2], "admin@example.com"));
}

#[test]
fn activated_products_null_is_empty() {
    reset(Some(b"null"));
    assert!(connect().activated_products().unwrap().is_empty());
}

#[test]
fn system_activations_list() {
    reset(Some(
        br#"[{"name":"SLES","status":"ACTIVE","regcode":"R","type":"full","starts_at":"2024-01-01T00:00:00Z","expires_at":"2025-01-01T00:00:00Z","service":{"id":1}}]"#,
    ));
    let activations = connect().system_activations().unwrap();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0].kind, "full");
    assert_eq!(activations[0].service["id"], json!(1));
}

#[test]
fn offline_migrations_send_three_arguments() {
    reset(Some(b"[]"));
    let installed = vec![Product::new("SLES", "15.4", "x86_64")];
    let target = Product::new("SLES", "15.5", "x86_64");
    let migrations = connect().offline_system_migrations(&installed, &target).unwrap();
    assert_eq!(migrations, json!([]));
    with_ledger(|l| {
        assert_eq!(l.args[0].len(), 3);
        let sent: Value = serde_json::from_str(&l.args[0][1]).unwrap();
        assert_eq!(sent[0]["version"], "15.4");
    });
}

#[test]
fn certificates_and_config() {
    reset(Some(b"{}"));
    let c = connect();
    c.update_certificates().unwrap();
    c.reload_certificates().unwrap();
    c.write_config().unwrap();
    c.deactivate_system().unwrap();
    with_ledger(|l| {
        assert_eq!(l.args.len(), 4);
        assert!(l.args[0].is_empty());
        assert_eq!(l.freed.len(), 4);
        assert_eq!(l.freed, l.returned);
    });
}

#[test]
fn get_config_value() {
    reset(Some(br#"{"url":"https://scc.suse.com","insecure":false,"language":""}"#));
    let cfg = connect().default_config().unwrap();
    assert_eq!(cfg["url"], "https://scc.suse.com");
    with_ledger(|l| assert_eq!(l.args[0], vec!["/etc/SUSEConnect".to_string()]));
}

#[test]
fn search_package_json_error() {
    reset(Some(
        br#"{"err_type":"JSONError","message":"unexpected end of JSON input","code":0}"#,
    ));
    let err = connect()
        .search_package(&Product::new("SLES", "15.5", "x86_64"), "vim")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidJson { .. }));
}

#[test]
fn log_callback_is_installed() {
    reset(Some(b"{}"));
    let c = connect();
    assert!(log_bridge::install(c.library()));
    with_ledger(|l| assert!(l.log_callback.is_some()));

    let out = capture_logs(|| {
        emit_native_log(2, "-> GET https://scc.suse.com/connect/systems/activations\n")
    });
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1, "{out}");
    assert!(lines[0].contains("INFO"), "{out}");
    assert!(lines[0].contains("libsuseconnect"), "{out}");
    assert!(lines[0].ends_with("-> GET https://scc.suse.com/connect/systems/activations"));
}
