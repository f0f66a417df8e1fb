use mockito::Matcher;
use serde_json::json;

use fintech_console::models::{Card, ValidateCardRequest};
use fintech_console::{ClientError, FinTechClient, PaymentsApi};

fn client(server: &mockito::Server) -> FinTechClient {
    FinTechClient::from_base_url(&format!("{}/api", server.url())).unwrap()
}

#[tokio::test]
async fn test_get_account() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/accounts/A1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accountId":"A1","availableBalance":750,"postedBalance":1000}"#)
        .create_async()
        .await;

    let account = client(&server).get_account("A1").await.unwrap();
    assert_eq!(account.available_balance, 750);
    assert_eq!(account.posted_balance, 1000);
}

#[tokio::test]
async fn test_get_account_not_found() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/accounts/missing")
        .with_status(404)
        .with_body("Account not found")
        .create_async()
        .await;

    let err = client(&server).get_account("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_expenditure() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/accounts/A1/expenditure")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accountId":"A1","moneyIn":1000,"moneyOut":500}"#)
        .create_async()
        .await;

    let expenditure = client(&server).get_expenditure("A1").await.unwrap();
    assert_eq!(expenditure.money_in, 1000);
    assert_eq!(expenditure.money_out, 500);
}

#[tokio::test]
async fn test_list_accounts_accepts_bare_array() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/accounts")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"accountId": "A1", "availableBalance": 1000, "postedBalance": 1000},
                {"accountId": "A2", "availableBalance": 0, "postedBalance": 0}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let accounts = client(&server).list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[1].account_id, "A2");
}

#[tokio::test]
async fn test_create_and_get_card() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{"pan":"4111111111111111","expiryDate":"12/30","cvv":"123","accountId":"A1"}"#;

    let create = server
        .mock("POST", "/api/cards")
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(body.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/cards/4111111111111111")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let card = Card {
        pan: "4111111111111111".to_string(),
        expiry_date: "12/30".to_string(),
        cvv: "123".to_string(),
        account_id: "A1".to_string(),
    };
    let client = client(&server);

    assert_eq!(client.create_card(&card).await.unwrap(), card);
    assert_eq!(client.get_card(&card.pan).await.unwrap(), card);
    create.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_validate_card() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/cards/validate")
        .match_body(Matcher::Json(json!({
            "pan": "4111111111111111",
            "expiryDate": "01/20",
            "cvv": "123"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"isValid":false,"message":"Card expired"}"#)
        .create_async()
        .await;

    let validation = client(&server)
        .validate_card(&ValidateCardRequest {
            pan: "4111111111111111".to_string(),
            expiry_date: "01/20".to_string(),
            cvv: "123".to_string(),
        })
        .await
        .unwrap();

    assert!(!validation.is_valid);
    assert_eq!(validation.message, "Card expired");
}

#[tokio::test]
async fn test_card_text_answer_is_unexpected_payload() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/cards/4111111111111111")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("card service offline")
        .create_async()
        .await;

    let err = client(&server)
        .get_card("4111111111111111")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedPayload(_)));
}
