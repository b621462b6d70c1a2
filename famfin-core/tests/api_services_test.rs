//! Integration tests for the feature services against a mocked finance API
//!
//! Each test builds a full `FamfinContext` whose settings point at a
//! wiremock server, with a session restored from an in-memory store.
//!
//! Run with: cargo test --test api_services_test -- --nocapture

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use famfin_core::adapters::MemoryKeyValueStore;
use famfin_core::domain::{PasswordChangeForm, TransactionDraft, TransactionFilter, TransactionType};
use famfin_core::ports::{TOKEN_KEY, USER_KEY};
use famfin_core::services::Diagnostics;
use famfin_core::{DashboardPeriod, FamfinContext};

// ============================================================================
// Test Helpers
// ============================================================================

const AUTH: &str = "Bearer tok-ana";

struct Harness {
    server: MockServer,
    ctx: FamfinContext,
    _temp_dir: TempDir,
}

async fn signed_in() -> Harness {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        json!({"api": {"baseUrl": format!("{}/api", server.uri()), "timeoutSecs": 5}}).to_string(),
    )
    .unwrap();

    let storage = MemoryKeyValueStore::with_entries([
        (TOKEN_KEY, "tok-ana"),
        (USER_KEY, r#"{"_id":"u1","name":"Ana","email":"ana@example.com"}"#),
    ]);
    let ctx = FamfinContext::with_store(temp_dir.path(), Arc::new(storage), Diagnostics::disabled())
        .expect("Failed to build context");
    assert!(ctx.session.restore().await.is_authenticated());

    Harness {
        server,
        ctx,
        _temp_dir: temp_dir,
    }
}

fn transaction_json(id: &str, creator: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "type": "expense",
        "amount": "125000.50",
        "description": "Belanja mingguan",
        "category": "Belanja",
        "date": "2024-03-15T00:00:00.000Z",
        "createdBy": {"_id": creator, "name": "Ana"}
    })
}

fn draft(amount: &str, date: &str) -> TransactionDraft {
    TransactionDraft {
        kind: TransactionType::Expense,
        amount: amount.to_string(),
        description: "Makan siang".to_string(),
        category: "Makanan".to_string(),
        date: date.to_string(),
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn test_list_sends_explicit_token_and_filters() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .and(header("authorization", AUTH))
        .and(query_param("search", "belanja"))
        .and(query_param("type", "expense"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json("t1", "u1")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filter = TransactionFilter {
        search: "belanja".to_string(),
        kind: Some(TransactionType::Expense),
    };
    let transactions = h.ctx.transaction_service.list(&filter).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, Decimal::new(12500050, 2));
    assert_eq!(transactions[0].date_only(), "2024-03-15");
}

#[tokio::test]
async fn test_list_errors_omit_the_request_url() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&h.server)
        .await;

    let filter = TransactionFilter {
        search: "arisan-rahasia".to_string(),
        kind: None,
    };
    let err = h.ctx.transaction_service.list(&filter).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Failed to parse API response"));
    assert!(!message.contains("arisan-rahasia"));
    assert!(!message.contains(&h.server.uri()));
}

#[tokio::test]
async fn test_invalid_drafts_never_reach_the_server() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let service = &h.ctx.transaction_service;
    let result = service.submit(&draft("0", "2024-03-15"), None).await;
    assert_eq!(result.error_message(), "Jumlah harus berupa angka lebih dari 0");

    let result = service.submit(&draft("abc", "2024-03-15"), None).await;
    assert_eq!(result.error_message(), "Jumlah harus berupa angka lebih dari 0");

    let result = service.submit(&draft("5000", "15-03-2024"), None).await;
    assert_eq!(result.error_message(), "Format tanggal harus YYYY-MM-DD");

    let result = service.submit(&draft("", "2024-03-15"), None).await;
    assert_eq!(result.error_message(), "Semua field harus diisi");
}

#[tokio::test]
async fn test_create_posts_payload_with_user() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .and(header("authorization", AUTH))
        .and(body_json(json!({
            "type": "expense",
            "amount": 25000.0,
            "description": "Makan siang",
            "category": "Makanan",
            "date": "2024-03-15",
            "user": "u1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "t9"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h
        .ctx
        .transaction_service
        .submit(&draft("25000", "2024-03-15"), None)
        .await;
    assert!(result.success, "submit failed: {}", result.error_message());
}

#[tokio::test]
async fn test_update_maps_server_errors() {
    let h = signed_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/transactions/t1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&h.server)
        .await;

    let existing: famfin_core::Transaction =
        serde_json::from_value(transaction_json("t1", "u1")).unwrap();
    let result = h
        .ctx
        .transaction_service
        .submit(&existing.to_draft(), Some(&existing))
        .await;
    assert!(!result.success);
    assert_eq!(result.error_message(), "Sesi telah berakhir, silakan login kembali");
}

#[tokio::test]
async fn test_only_creator_may_delete() {
    let h = signed_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/transactions/t2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/transactions/t1"))
        .and(header("authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let theirs: famfin_core::Transaction =
        serde_json::from_value(transaction_json("t2", "u2")).unwrap();
    let result = h.ctx.transaction_service.delete(&theirs).await;
    assert_eq!(result.error_message(), "Anda tidak memiliki izin untuk melakukan ini");

    let mine: famfin_core::Transaction =
        serde_json::from_value(transaction_json("t1", "u1")).unwrap();
    assert!(h.ctx.transaction_service.delete(&mine).await.success);
}

// ============================================================================
// Family
// ============================================================================

#[tokio::test]
async fn test_no_family_is_not_an_error() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/family/my-family"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&h.server)
        .await;

    let result = h.ctx.family_service.my_family().await;
    assert!(result.success);
    assert_eq!(result.data, Some(None));
}

#[tokio::test]
async fn test_family_load_failure_message() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/family/my-family"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let result = h.ctx.family_service.my_family().await;
    assert!(!result.success);
    assert_eq!(result.error_message(), "Terjadi kesalahan saat mengambil data keluarga");
}

#[tokio::test]
async fn test_create_family() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/family/create"))
        .and(header("Authorization", AUTH))
        .and(body_json(json!({"name": "Keluarga Santoso"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&h.server)
        .await;

    let service = &h.ctx.family_service;
    assert!(service.create("  Keluarga Santoso ").await.success);
}

#[tokio::test]
async fn test_create_family_requires_name() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/family/create"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let result = h.ctx.family_service.create("   ").await;
    assert!(!result.success);
    assert_eq!(result.error_message(), "Nama keluarga harus diisi");
}

#[tokio::test]
async fn test_create_family_failure_uses_fallback() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/family/create"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let result = h.ctx.family_service.create("Santoso").await;
    assert!(!result.success);
    assert_eq!(result.error_message(), "Gagal membuat keluarga");
}

#[tokio::test]
async fn test_join_family() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/family/join"))
        .and(body_json(json!({"inviteCode": "AB12CD"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let service = &h.ctx.family_service;
    assert_eq!(
        service.join("   ").await.error_message(),
        "Masukkan kode invite terlebih dahulu"
    );
    assert!(service.join(" AB12CD ").await.success);
}

#[tokio::test]
async fn test_join_family_failure_uses_server_message() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/family/join"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Kode invite tidak valid"})))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/family/leave"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let service = &h.ctx.family_service;
    assert_eq!(service.join("ZZZ").await.error_message(), "Kode invite tidak valid");
    assert_eq!(service.leave().await.error_message(), "Gagal keluar dari keluarga");
}

#[tokio::test]
async fn test_family_details_parse() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/family/my-family"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Santoso",
            "inviteCode": "AB12CD",
            "members": [
                {"_id": "u1", "name": "Ana", "role": "owner"},
                {"_id": "u2", "name": "Budi", "role": "member"}
            ]
        })))
        .mount(&h.server)
        .await;

    let family = h.ctx.family_service.my_family().await.data.flatten().unwrap();
    assert_eq!(family.member_count(), 2);
    assert!(family.is_owned_by(Some("u1")));
}

// ============================================================================
// Dashboard
// ============================================================================

async fn mock_dashboard(server: &MockServer, stats_status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/transactions/family/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalIncome": 5000000, "totalExpense": 1250000, "balance": 3750000
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/family/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json("t1", "u1")])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/family/monthly-stats"))
        .and(query_param("months", "3"))
        .respond_with(ResponseTemplate::new(stats_status).set_body_json(json!({
            "months": ["Jan", "Feb", "Mar"],
            "income": [1000000, null, "2000000"],
            "expense": [500000, -20, 750000]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_dashboard_load() {
    let h = signed_in().await;
    mock_dashboard(&h.server, 200).await;

    let data = h
        .ctx
        .dashboard_service
        .load(DashboardPeriod::ThreeMonths)
        .await
        .unwrap();
    assert_eq!(data.summary.balance, Decimal::new(3750000, 0));
    assert_eq!(data.recent.len(), 1);

    let chart = data.chart();
    assert_eq!(chart.labels, vec!["Jan", "Feb", "Mar"]);
    assert_eq!(chart.income, vec![1000000.0, 0.0, 2000000.0]);
    assert_eq!(chart.expense, vec![500000.0, 0.0, 750000.0]);
}

#[tokio::test]
async fn test_dashboard_fails_when_any_request_fails() {
    let h = signed_in().await;
    mock_dashboard(&h.server, 500).await;

    let result = h.ctx.dashboard_service.load(DashboardPeriod::ThreeMonths).await;
    assert!(matches!(result, Err(famfin_core::Error::Api { status: 500, .. })));
}

// ============================================================================
// Account
// ============================================================================

#[tokio::test]
async fn test_change_password() {
    let h = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .and(header("authorization", AUTH))
        .and(body_json(json!({"oldPassword": "lama123", "newPassword": "baru1234"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let service = &h.ctx.account_service;
    let mismatch = PasswordChangeForm {
        old_password: "lama123".to_string(),
        new_password: "baru1234".to_string(),
        confirm_password: "baru12345".to_string(),
    };
    assert_eq!(service.change_password(&mismatch).await.error_message(), "Password baru tidak cocok");

    let short = PasswordChangeForm {
        old_password: "lama123".to_string(),
        new_password: "abc".to_string(),
        confirm_password: "abc".to_string(),
    };
    assert_eq!(service.change_password(&short).await.error_message(), "Password minimal 6 karakter");

    let valid = PasswordChangeForm {
        old_password: "lama123".to_string(),
        new_password: "baru1234".to_string(),
        confirm_password: "baru1234".to_string(),
    };
    assert!(service.change_password(&valid).await.success);
}

#[tokio::test]
async fn test_signed_out_services_refuse_without_network() {
    let h = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    h.ctx.session.logout().await;

    let result = h.ctx.transaction_service.list(&TransactionFilter::default()).await;
    assert!(matches!(result, Err(famfin_core::Error::Unauthenticated)));
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_context_builds_over_unusable_settings() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        json!({"api": {"baseUrl": "localhost:5000/api"}, "dashboard": {"defaultPeriodMonths": 5}})
            .to_string(),
    )
    .unwrap();

    let ctx = FamfinContext::with_store(
        temp_dir.path(),
        Arc::new(MemoryKeyValueStore::new()),
        Diagnostics::disabled(),
    )
    .expect("Context should fall back to defaults");
    assert_eq!(ctx.config.default_period, DashboardPeriod::SixMonths);
    assert_eq!(ctx.config.issues.len(), 2);

    let stored =
        famfin_core::config::Config::store_api_base_url(temp_dir.path(), "http://10.0.0.2:5000/api")
            .unwrap();
    assert_eq!(stored, "http://10.0.0.2:5000/api");

    let ctx = FamfinContext::with_store(
        temp_dir.path(),
        Arc::new(MemoryKeyValueStore::new()),
        Diagnostics::disabled(),
    )
    .unwrap();
    assert_eq!(ctx.config.api_base_url, "http://10.0.0.2:5000/api");
    assert_eq!(ctx.config.issues.len(), 1);
}
