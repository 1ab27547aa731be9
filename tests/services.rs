mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::{
    matchers::{
        body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
    },
    Mock, MockServer, ResponseTemplate,
};

use credito_api::{
    lifecycle::wizard::{Progress, Wizard, WizardStep},
    models::{
        auth::{GroupInput, Role, Session},
        client::{DocumentationInput, DomicileInput, EmploymentInput},
        credit::{CreditFilters, CreditInput, CreditState},
        payment::{InstallmentPaymentInput, PaymentMethod, PaymentStatus},
    },
    repos::api::{
        audit::AuditService, billing::BillingService, client::ClientService,
        credit::CreditService, payment::PaymentService, user::UserService,
        wizard::CreditWizardPersister, ApiClient, ApiError,
    },
};

use common::{
    api_for, credit_json, pending_payment_json, session_as, subscription, MemoryCache, TENANT,
    TENANT_HEADER, TOKEN,
};

fn credit_service(server: &MockServer, role: Role) -> CreditService {
    CreditService {
        api: api_for(server),
        session: session_as(role),
    }
}

//* Credits

#[tokio::test]
async fn listing_sends_token_tenant_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/"))
        .and(header("Authorization", format!("Token {TOKEN}").as_str()))
        .and(header(TENANT_HEADER, TENANT))
        .and(query_param("estado", "Pendiente"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [credit_json(11, "Pendiente", "FASE_6")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = CreditFilters {
        state: Some(CreditState::Pendiente),
        ..CreditFilters::default()
    };
    let page = credit_service(&server, Role::Gerente)
        .list(&filters)
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].id, 11);
    assert_eq!(page.results[0].phase, "FASE_6");
}

#[tokio::test]
async fn credit_crud_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Creditos/creditos/"))
        .and(body_json(json!({
            "monto": 15000.0,
            "estado": "SOLICITADO",
            "fase_actual": "FASE_1",
            "cliente": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(credit_json(11, "SOLICITADO", "FASE_1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Creditos/creditos/11/"))
        .and(body_json(json!({ "fase_actual": "FASE_2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(credit_json(11, "SOLICITADO", "FASE_2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Creditos/creditos/11/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = credit_service(&server, Role::Gerente);
    let created = service
        .create(&CreditInput {
            amount: Some(15000.0),
            state: Some(CreditState::Solicitado),
            phase: Some("FASE_1".to_owned()),
            client_id: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(created.state, CreditState::Solicitado);

    let moved = service
        .update(
            11,
            &CreditInput {
                phase: Some("FASE_2".to_owned()),
                ..CreditInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.phase, "FASE_2");

    service.delete(11).await.unwrap();
}

#[tokio::test]
async fn unknown_phase_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = credit_service(&server, Role::Administrador)
        .create(&CreditInput {
            phase: Some("FASE_12".to_owned()),
            ..CreditInput::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn approving_needs_approval_rights() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = credit_service(&server, Role::Usuario)
        .update(
            11,
            &CreditInput {
                state: Some(CreditState::Aprobado),
                ..CreditInput::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }), "{err:?}");
}

#[tokio::test]
async fn history_accepts_a_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/11/historial/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "fase_anterior": null,
                "fase_nueva": "FASE_1",
                "fecha": "2024-03-01T14:30:00Z",
                "usuario": "analista",
                "descripcion": "Solicitud creada",
                "datos": {}
            },
            {
                "id": 2,
                "fase_anterior": "FASE_1",
                "fase_nueva": "FASE_2",
                "fecha": "2024-03-02T09:00:00Z",
                "usuario": "analista"
            }
        ])))
        .mount(&server)
        .await;

    let events = credit_service(&server, Role::Contador)
        .history(11)
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[1].previous_phase.as_deref(), Some("FASE_1"));
    assert!(events[1].payload.is_empty());
}

fn history_event(id: i32, from: Option<&str>, to: &str, day: u32) -> serde_json::Value {
    json!({
        "id": id,
        "fase_anterior": from,
        "fase_nueva": to,
        "fecha": format!("2024-03-{day:02}T09:00:00Z"),
        "usuario": "analista"
    })
}

#[tokio::test]
async fn history_follows_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/11/historial/"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": format!("{}/api/Creditos/creditos/11/historial/?page=2", server.uri()),
            "previous": null,
            "results": [
                history_event(1, None, "FASE_1", 1),
                history_event(2, Some("FASE_1"), "FASE_2", 2)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/11/historial/"))
        .and(query_param("page", "2"))
        .and(header(TENANT_HEADER, TENANT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": format!("{}/api/Creditos/creditos/11/historial/", server.uri()),
            "results": [history_event(3, Some("FASE_2"), "FASE_3", 3)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = credit_service(&server, Role::Contador)
        .history(11)
        .await
        .unwrap();

    let ids: Vec<i32> = events.iter().map(|event| event.id).collect();
    assert_eq!(ids, vec![1, 2, 3], "Ningún evento de la segunda página se pierde");
}

#[tokio::test]
async fn null_event_payload_does_not_break_the_history() {
    let server = MockServer::start().await;
    let mut event = history_event(1, None, "FASE_1", 1);
    event["datos"] = serde_json::Value::Null;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/11/historial/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event])))
        .mount(&server)
        .await;

    let events = credit_service(&server, Role::Contador)
        .history(11)
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert!(events[0].payload.is_empty());
}

//* Errors

#[tokio::test]
async fn statuses_become_typed_errors() {
    let server = MockServer::start().await;
    for (id, status) in [(1, 401u16), (2, 403), (3, 404), (4, 400), (5, 502)] {
        Mock::given(method("GET"))
            .and(path(format!("/api/Creditos/creditos/{id}/")))
            .respond_with(ResponseTemplate::new(status).set_body_string("{\"detail\":\"x\"}"))
            .mount(&server)
            .await;
    }

    let service = credit_service(&server, Role::Gerente);
    let codes: Vec<&str> = {
        let mut codes = Vec::new();
        for id in 1..=5 {
            codes.push(service.get_by_id(id).await.unwrap_err().code());
        }
        codes
    };

    assert_eq!(
        codes,
        vec!["UNAUTHORIZED", "FORBIDDEN", "NOT_FOUND", "REJECTED", "SERVER_ERROR"]
    );

    let err = service.get_by_id(4).await.unwrap_err();
    assert_eq!(err.body(), Some("{\"detail\":\"x\"}"));
    assert_eq!(err.http_status().as_u16(), 400);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Creditos/creditos/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = credit_service(&server, Role::Gerente)
        .get_by_id(1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn anonymous_callers_are_stopped_locally() {
    let server = MockServer::start().await;
    let service = CreditService {
        api: api_for(&server),
        session: Session::default(),
    };

    let err = service.get_by_id(1).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 0);
}

//* Installments

#[tokio::test]
async fn exact_payment_completes_the_installment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Pagos/pagos/21/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_payment_json(21, "100.00")))
        .expect(1)
        .mount(&server)
        .await;

    let mut completed = pending_payment_json(21, "100.00");
    completed["estado"] = json!("COMPLETADO");
    completed["monto_pagado"] = json!("100.00");
    completed["fecha_pago"] = json!("2024-06-28T10:15:00Z");
    completed["metodo_pago"] = json!("EFECTIVO");
    Mock::given(method("PATCH"))
        .and(path("/api/Pagos/pagos/21/"))
        .and(body_partial_json(json!({
            "estado": "COMPLETADO",
            "monto_pagado": 100.0,
            "metodo_pago": "EFECTIVO"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed))
        .expect(1)
        .mount(&server)
        .await;

    let service = PaymentService {
        api: api_for(&server),
        session: session_as(Role::Contador),
    };
    let payment = service
        .process_installment(&InstallmentPaymentInput {
            payment_id: 21,
            amount: 100.00,
            method: PaymentMethod::Efectivo,
            transaction_reference: None,
        })
        .await
        .unwrap();

    assert_eq!(payment.status, PaymentStatus::Completado);
    assert!(payment.paid_at.is_some());

    let requests = server.received_requests().await.unwrap();
    let patch: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert!(patch["fecha_pago"].is_string(), "La fecha de pago viaja en el PATCH");
}

#[tokio::test]
async fn short_payment_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Pagos/pagos/21/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_payment_json(21, "100.00")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = PaymentService {
        api: api_for(&server),
        session: session_as(Role::Gerente),
    };
    let err = service
        .process_installment(&InstallmentPaymentInput {
            payment_id: 21,
            amount: 99.99,
            method: PaymentMethod::Transferencia,
            transaction_reference: Some("TRX-1".to_owned()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)), "{err:?}");
}

//* Users

#[tokio::test]
async fn self_deactivation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = UserService {
        api: api_for(&server),
        session: session_as(Role::Administrador),
    };
    let err = service.deactivate(common::USER_ID).await.unwrap_err();

    assert_eq!(err.to_string(), "No puede desactivar su propio usuario");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivating_someone_else() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/User/user/12/"))
        .and(body_json(json!({ "is_active": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "username": "cajero",
            "rol": "contador",
            "is_active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = UserService {
        api: api_for(&server),
        session: session_as(Role::Superadmin),
    };
    let user = service.deactivate(12).await.unwrap();

    assert!(!user.is_active);
    assert_eq!(user.role, Role::Contador);
}

fn user_json(id: i32, username: &str, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@empresa.com"),
        "rol": "contador",
        "is_active": active
    })
}

fn user_service(server: &MockServer, role: Role) -> UserService {
    UserService {
        api: api_for(server),
        session: session_as(role),
    }
}

#[tokio::test]
async fn users_are_listed_and_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/User/user/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 11,
            "next": null,
            "previous": format!("{}/api/User/user/?page=1", server.uri()),
            "results": [user_json(12, "cajero", true)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/User/user/12/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(12, "cajero", true)))
        .expect(1)
        .mount(&server)
        .await;

    let service = user_service(&server, Role::Administrador);

    let page = service.list(Some(2)).await.unwrap();
    assert_eq!(page.count, 11);
    assert_eq!(page.results[0].username, "cajero");
    assert!(page.previous.is_some());

    let user = service.get(12).await.unwrap();
    assert_eq!(user.email, "cajero@empresa.com");
}

#[tokio::test]
async fn managing_users_needs_admin_rights() {
    let server = MockServer::start().await;

    let err = user_service(&server, Role::Gerente)
        .list(None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn activating_a_user() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/User/user/12/"))
        .and(body_json(json!({ "is_active": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(12, "cajero", true)))
        .expect(1)
        .mount(&server)
        .await;

    let user = user_service(&server, Role::Superadmin)
        .activate(12)
        .await
        .unwrap();

    assert!(user.is_active);
}

#[tokio::test]
async fn group_crud_round() {
    let server = MockServer::start().await;
    let group = json!({ "id": 4, "name": "Cajeros", "permissions": [1, 2] });
    Mock::given(method("GET"))
        .and(path("/api/User/grupos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/User/grupos/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/User/grupos/"))
        .and(body_json(json!({ "name": "Cajeros", "permissions": [1, 2] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(group.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/User/grupos/4/"))
        .and(body_json(json!({ "permissions": [1] })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 4, "name": "Cajeros", "permissions": [1] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/User/grupos/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = user_service(&server, Role::Administrador);

    let groups = service.list_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(service.get_group(4).await.unwrap().permissions, vec![1, 2]);

    let created = service
        .create_group(&GroupInput {
            name: Some("Cajeros".to_owned()),
            permissions: Some(vec![1, 2]),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 4);

    let updated = service
        .update_group(
            4,
            &GroupInput {
                name: None,
                permissions: Some(vec![1]),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.permissions, vec![1]);

    service.delete_group(4).await.unwrap();
}

#[tokio::test]
async fn unnamed_group_is_refused_locally() {
    let server = MockServer::start().await;
    let service = user_service(&server, Role::Administrador);

    for name in [None, Some("   ".to_owned())] {
        let err = service
            .create_group(&GroupInput {
                name,
                permissions: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "El grupo necesita un nombre");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn permissions_follow_relative_next_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/User/permisos/"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": "/api/User/permisos/?page=2",
            "previous": null,
            "results": [{ "id": 1, "name": "Can add credito", "codename": "add_credito" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/User/permisos/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "previous": "/api/User/permisos/",
            "results": [{ "id": 2, "name": "Can view credito", "codename": "view_credito" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let permissions = user_service(&server, Role::Superadmin)
        .list_permissions()
        .await
        .unwrap();

    let codenames: Vec<&str> = permissions
        .iter()
        .map(|permission| permission.codename.as_str())
        .collect();
    assert_eq!(codenames, vec!["add_credito", "view_credito"]);
}

#[tokio::test]
async fn pagination_loop_stops_after_one_round() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/User/grupos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": "/api/User/grupos/",
            "previous": null,
            "results": [{ "id": 4, "name": "Cajeros" }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let groups = user_service(&server, Role::Administrador)
        .list_groups()
        .await
        .unwrap();

    assert_eq!(groups.len(), 2);
}

//* Client records

fn client_service(server: &MockServer, role: Role) -> ClientService {
    ClientService {
        api: api_for(server),
        session: session_as(role),
    }
}

#[tokio::test]
async fn documentation_crud_round() {
    let server = MockServer::start().await;
    let record = json!({ "id": 31, "cliente": 3, "tipo_documento": "DNI", "numero_documento": "30111222" });
    Mock::given(method("GET"))
        .and(path("/api/Clientes/documentacion/"))
        .and(query_param("cliente", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Clientes/documentacion/"))
        .and(body_json(json!({ "cliente": 3, "tipo_documento": "DNI", "numero_documento": "30111222" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(record.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Clientes/documentacion/31/"))
        .and(body_partial_json(json!({ "archivo": "dni.pdf" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "cliente": 3, "tipo_documento": "DNI", "numero_documento": "30111222", "archivo": "dni.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Clientes/documentacion/31/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = client_service(&server, Role::Usuario);
    let mut input = DocumentationInput {
        client_id: 3,
        document_type: "DNI".to_owned(),
        document_number: "30111222".to_owned(),
        file: None,
    };

    assert_eq!(service.documentation_of(3).await.unwrap().len(), 1);
    assert_eq!(service.create_documentation(&input).await.unwrap().id, 31);

    input.file = Some("dni.pdf".to_owned());
    let updated = service.update_documentation(31, &input).await.unwrap();
    assert_eq!(updated.file.as_deref(), Some("dni.pdf"));

    service.delete_documentation(31).await.unwrap();
}

#[tokio::test]
async fn employment_crud_round() {
    let server = MockServer::start().await;
    let record = json!({
        "id": 41, "cliente": 3, "empresa": "Acme", "cargo": "Cajera", "ingreso_mensual": "2500.00"
    });
    Mock::given(method("GET"))
        .and(path("/api/Clientes/laboral/"))
        .and(query_param("cliente", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "next": null, "previous": null, "results": [record]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Clientes/laboral/"))
        .and(body_partial_json(json!({ "cliente": 3, "empresa": "Acme", "antiguedad_meses": 18 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(record.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Clientes/laboral/41/"))
        .and(body_partial_json(json!({ "cargo": "Supervisora" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 41, "cliente": 3, "empresa": "Acme", "cargo": "Supervisora", "ingreso_mensual": 3100
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Clientes/laboral/41/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = client_service(&server, Role::Gerente);
    let mut input = EmploymentInput {
        client_id: 3,
        employer: "Acme".to_owned(),
        position: "Cajera".to_owned(),
        monthly_income: 2500.0,
        months_employed: Some(18),
    };

    let records = service.employment_of(3).await.unwrap();
    assert_eq!(records[0].monthly_income, 2500.0);
    assert_eq!(service.create_employment(&input).await.unwrap().id, 41);

    input.position = "Supervisora".to_owned();
    let updated = service.update_employment(41, &input).await.unwrap();
    assert_eq!(updated.monthly_income, 3100.0);

    service.delete_employment(41).await.unwrap();
}

#[tokio::test]
async fn domicile_crud_round() {
    let server = MockServer::start().await;
    let record = json!({ "id": 51, "cliente": 3, "direccion": "Calle 1", "ciudad": "Córdoba" });
    Mock::given(method("GET"))
        .and(path("/api/Clientes/domicilio/"))
        .and(query_param("cliente", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Clientes/domicilio/"))
        .and(body_json(json!({ "cliente": 3, "direccion": "Calle 1", "ciudad": "Córdoba" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(record.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Clientes/domicilio/51/"))
        .and(body_partial_json(json!({ "tipo_vivienda": "Alquilada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 51, "cliente": 3, "direccion": "Calle 1", "ciudad": "Córdoba", "tipo_vivienda": "Alquilada"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Clientes/domicilio/51/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = client_service(&server, Role::Usuario);
    let mut input = DomicileInput {
        client_id: 3,
        address: "Calle 1".to_owned(),
        city: "Córdoba".to_owned(),
        housing_type: None,
    };

    assert_eq!(service.domiciles_of(3).await.unwrap()[0].city, "Córdoba");
    assert_eq!(service.create_domicile(&input).await.unwrap().id, 51);

    input.housing_type = Some("Alquilada".to_owned());
    let updated = service.update_domicile(51, &input).await.unwrap();
    assert_eq!(updated.housing_type.as_deref(), Some("Alquilada"));

    service.delete_domicile(51).await.unwrap();
}

#[tokio::test]
async fn accountants_cannot_edit_client_records() {
    let server = MockServer::start().await;

    let err = client_service(&server, Role::Contador)
        .delete_domicile(51)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

//* Billing

fn billing(api: ApiClient, cache: MemoryCache) -> BillingService<MemoryCache> {
    BillingService {
        api,
        session: session_as(Role::Administrador),
        cache,
    }
}

#[tokio::test]
async fn fresh_subscription_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Suscripciones/suscripcion/actual/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "plan": "Profesional",
            "estado": "ACTIVA",
            "fecha_inicio": "2024-01-01",
            "fecha_fin": "2024-12-31",
            "monto": "499.00"
        })))
        .mount(&server)
        .await;

    let service = billing(api_for(&server), MemoryCache::default());
    let current = service.current_subscription().await.unwrap();

    assert!(!current.from_cache);
    assert_eq!(
        service.cache.entries.lock().unwrap().get(TENANT),
        Some(&current.subscription)
    );
}

#[tokio::test]
async fn backend_down_serves_the_cached_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let cache = MemoryCache::default();
    cache
        .entries
        .lock()
        .unwrap()
        .insert(TENANT.to_owned(), subscription());

    let current = billing(api_for(&server), cache)
        .current_subscription()
        .await
        .unwrap();

    assert!(current.from_cache);
    assert_eq!(current.subscription.plan, "Profesional");
}

#[tokio::test]
async fn unreachable_backend_without_cache_fails() {
    // nothing listens on the discard port
    let api = ApiClient::new("http://127.0.0.1:9", TENANT_HEADER, Duration::from_secs(2)).unwrap();

    let err = billing(api, MemoryCache::default())
        .current_subscription()
        .await
        .unwrap_err();

    assert!(err.is_unavailable(), "{err:?}");
}

#[tokio::test]
async fn rejected_request_ignores_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let cache = MemoryCache::default();
    cache
        .entries
        .lock()
        .unwrap()
        .insert(TENANT.to_owned(), subscription());

    let err = billing(api_for(&server), cache)
        .current_subscription()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }));
}

//* Audit

#[tokio::test]
async fn audit_is_read_with_view_rights_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Auditoria/historial/"))
        .and(query_param("modelo", "Credito"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "usuario": "gerente",
            "accion": "UPDATE",
            "modelo": "Credito",
            "objeto_id": "11",
            "fecha": "2024-03-02T09:00:00Z",
            "cambios": { "estado": "Aprobado" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = credito_api::models::audit::AuditFilters {
        model: Some("Credito".to_owned()),
        ..Default::default()
    };

    let entries = AuditService {
        api: api_for(&server),
        session: session_as(Role::Contador),
    }
    .list(&filters)
    .await
    .unwrap();
    assert_eq!(entries.count, 1);

    let err = AuditService {
        api: api_for(&server),
        session: session_as(Role::Usuario),
    }
    .list(&filters)
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));
}

//* Wizard

async fn mount_created(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(201).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn fill(wizard: &mut Wizard, values: &[(&str, &str)]) {
    wizard.set_values(
        values
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    );
}

#[tokio::test]
async fn wizard_creates_every_record_and_submits() {
    let server = MockServer::start().await;
    mount_created(
        &server,
        "/api/Clientes/clientes/",
        json!({ "id": 3, "nombre": "Ana", "apellido": "Pérez", "telefono": "5551234" }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/Creditos/creditos/"))
        .and(body_partial_json(json!({
            "estado": "SOLICITADO",
            "fase_actual": "FASE_1",
            "cliente": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(credit_json(11, "SOLICITADO", "FASE_1")))
        .expect(1)
        .mount(&server)
        .await;
    mount_created(
        &server,
        "/api/Clientes/documentacion/",
        json!({ "id": 31, "cliente": 3, "tipo_documento": "DNI", "numero_documento": "30111222" }),
    )
    .await;
    mount_created(
        &server,
        "/api/Clientes/laboral/",
        json!({ "id": 41, "cliente": 3, "empresa": "Acme", "cargo": "Cajera", "ingreso_mensual": "2500.00" }),
    )
    .await;
    mount_created(
        &server,
        "/api/Clientes/domicilio/",
        json!({ "id": 51, "cliente": 3, "direccion": "Calle 1", "ciudad": "Córdoba" }),
    )
    .await;
    mount_created(
        &server,
        "/api/Creditos/garantes/",
        json!({ "id": 61, "credito": 11, "nombre": "Luis", "apellido": "Pérez", "telefono": "5559876", "relacion": "Hermano" }),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Creditos/creditos/11/"))
        .and(body_json(json!({ "estado": "Pendiente", "fase_actual": "FASE_6" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(credit_json(11, "Pendiente", "FASE_6")))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_as(Role::Usuario);
    let persister = CreditWizardPersister {
        credits: CreditService {
            api: api_for(&server),
            session: session.clone(),
        },
        clients: ClientService {
            api: api_for(&server),
            session,
        },
    };

    let mut wizard = Wizard::new();
    let steps: [&[(&str, &str)]; 5] = [
        &[("nombre", "Ana"), ("apellido", "Pérez"), ("telefono", "5551234"), ("monto", "15000")],
        &[("tipo_documento", "DNI"), ("numero_documento", "30111222")],
        &[("empresa", "Acme"), ("cargo", "Cajera"), ("ingreso_mensual", "2500.00")],
        &[("direccion", "Calle 1"), ("ciudad", "Córdoba")],
        &[("nombre", "Luis"), ("apellido", "Pérez"), ("telefono", "5559876"), ("relacion", "Hermano")],
    ];
    for values in steps {
        fill(&mut wizard, values);
        let progress = wizard.submit_step(&persister).await.unwrap();
        assert!(matches!(progress, Progress::Advanced(_)));
    }

    assert_eq!(wizard.current(), WizardStep::Revision);
    assert_eq!(wizard.client_id(), Some(3));
    assert_eq!(wizard.credit_id(), Some(11));

    assert_eq!(wizard.submit_step(&persister).await, Ok(Progress::Finished));
    assert!(wizard.is_submitted());
}

#[tokio::test]
async fn wizard_keeps_upstream_errors_inline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Clientes/clientes/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "telefono": ["Formato inválido"] })),
        )
        .mount(&server)
        .await;

    let session = session_as(Role::Usuario);
    let persister = CreditWizardPersister {
        credits: CreditService {
            api: api_for(&server),
            session: session.clone(),
        },
        clients: ClientService {
            api: api_for(&server),
            session,
        },
    };

    let mut wizard = Wizard::new();
    fill(
        &mut wizard,
        &[("nombre", "Ana"), ("apellido", "Pérez"), ("telefono", "x"), ("monto", "15000")],
    );

    assert!(wizard.submit_step(&persister).await.is_err());
    assert_eq!(wizard.current(), WizardStep::Solicitud);
    let message = wizard.last_error().unwrap();
    assert!(message.contains("Formato inválido"), "{message}");
    assert_eq!(wizard.credit_id(), None);
}

#[tokio::test]
async fn wizard_retry_reuses_the_client_already_created() {
    let server = MockServer::start().await;
    mount_created(
        &server,
        "/api/Clientes/clientes/",
        json!({ "id": 3, "nombre": "Ana", "apellido": "Pérez", "telefono": "5551234" }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/Creditos/creditos/"))
        .and(body_partial_json(json!({ "cliente": 3 })))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/Clientes/clientes/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "nombre": "Ana", "apellido": "Pérez", "telefono": "5551234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_as(Role::Usuario);
    let persister = CreditWizardPersister {
        credits: CreditService {
            api: api_for(&server),
            session: session.clone(),
        },
        clients: ClientService {
            api: api_for(&server),
            session,
        },
    };

    let mut wizard = Wizard::new();
    fill(
        &mut wizard,
        &[("nombre", "Ana"), ("apellido", "Pérez"), ("telefono", "5551234"), ("monto", "15000")],
    );

    assert!(wizard.submit_step(&persister).await.is_err());
    assert_eq!(wizard.client_id(), Some(3), "El cliente creado queda registrado");
    assert_eq!(wizard.credit_id(), None);

    assert!(wizard.submit_step(&persister).await.is_err());
    assert_eq!(wizard.current(), WizardStep::Solicitud);
    assert!(wizard.last_error().unwrap().contains("500"));
}
