//! API integration tests
//!
//! Run against a live server with a seeded admin account (admin/admin):
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Helper to get a staff token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to sign up a fresh student and log in. Returns (token, student_id).
async fn signup_student(client: &Client) -> (String, i64) {
    let username = unique("student");

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass",
            "first_name": "Test",
            "last_name": "Student",
            "enrollment": unique("enr"),
            "branch": "CS"
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse signup response");
    let student_id = body["student"]["id"].as_i64().expect("No student id");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();

    (token, student_id)
}

/// Helper to create a book as staff. Returns the book id.
async fn create_book(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": unique("Book"),
            "isbn": unique("isbn"),
            "author": "Test Author",
            "category": "novel"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book id")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_probes_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    // 200 only when the SELECT 1 probe against the pool succeeds
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_signup_and_me() {
    let client = Client::new();
    let (token, student_id) = signup_student(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["student"]["id"].as_i64(), Some(student_id));
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_staff() {
    let client = Client::new();

    // No token
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "name": "Unauthorized",
            "isbn": unique("isbn"),
            "author": "Nobody"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Student token
    let (student_token, _) = signup_student(&client).await;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({
            "name": "Forbidden",
            "isbn": unique("isbn"),
            "author": "Nobody"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflicts() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let isbn = unique("isbn");
    let book = json!({
        "name": "First Copy",
        "isbn": isbn,
        "author": "Author",
        "category": "science"
    });

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_flow() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;
    let (student_token, student_id) = signup_student(&client).await;
    let book_id = create_book(&client, &admin).await;

    // Student borrows the book for themselves
    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({ "book": book_id, "student": student_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow id");
    assert_eq!(body["returned"], false);
    assert!(body["returned_at"].is_null());
    assert_eq!(body["book"]["id"].as_i64(), Some(book_id));
    assert_eq!(body["student"]["id"].as_i64(), Some(student_id));
    assert_eq!(body["book"]["available"], false);

    // The book is no longer available
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], false);

    // A second borrow of the same book conflicts
    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({ "book": book_id, "student": student_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Staff returns the borrow
    let response = client
        .post(format!("{}/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["borrow"]["returned"], true);
    assert!(body["borrow"]["returned_at"].is_string());

    // The book is available again
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], true);

    // Returning it a second time conflicts
    let response = client
        .post(format!("{}/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_borrow_missing_fields() {
    let client = Client::new();
    let (student_token, _) = signup_student(&client).await;

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({ "book": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_book() {
    let client = Client::new();
    let (student_token, student_id) = signup_student(&client).await;

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&json!({ "book": 999999999, "student": student_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrow_for_another_student_forbidden() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;
    let (token_a, _) = signup_student(&client).await;
    let (_, student_b) = signup_student(&client).await;
    let book_id = create_book(&client, &admin).await;

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book": book_id, "student": student_b }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_return_by_other_student_forbidden() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;
    let (token_a, student_a) = signup_student(&client).await;
    let (token_b, _) = signup_student(&client).await;
    let book_id = create_book(&client, &admin).await;

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book": book_id, "student": student_a }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow id");

    // Another student may not return it
    let response = client
        .post(format!("{}/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The loan is still open
    let response = client
        .get(format!("{}/borrows/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let open = body
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"].as_i64() == Some(borrow_id))
        .expect("Borrow missing from own list");
    assert_eq!(open["returned"], false);
}

#[tokio::test]
#[ignore]
async fn test_my_borrows_most_recent_first() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;
    let (student_token, student_id) = signup_student(&client).await;

    for _ in 0..2 {
        let book_id = create_book(&client, &admin).await;
        let response = client
            .post(format!("{}/borrow", BASE_URL))
            .header("Authorization", format!("Bearer {}", student_token))
            .json(&json!({ "book": book_id, "student": student_id }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/borrows/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrows = body.as_array().expect("Expected array");
    assert!(borrows.len() >= 2);

    let times: Vec<&str> = borrows
        .iter()
        .map(|b| b["borrowed_at"].as_str().unwrap())
        .collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}

#[tokio::test]
#[ignore]
async fn test_stats_staff_only() {
    let client = Client::new();
    let (student_token, _) = signup_student(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", student_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let admin = get_admin_token(&client).await;
    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"]["total"].is_number());
    assert!(body["borrows"]["active"].is_number());
}
