//! 체크인부터 휴지통 복구까지의 흐름 테스트

use super::*;
use crate::features::billing::{FeeQuote, HotelingRates};
use crate::features::trash;
use crate::shared::errors::AppError;
use crate::test_support::{insert_customer, test_state, test_state_with_fees};

fn daycare(customer_id: i64) -> CheckInDto {
    CheckInDto {
        customer_id,
        visit_type: VisitType::Daycare,
        prepaid: false,
        prepaid_amount: None,
    }
}

#[test]
fn test_daycare_visit_flow() {
    let state = test_state("2024-05-01 09:00:00");
    let customer_id = insert_customer(&state, "초코", Some(10.0));

    let visit = check_in(&state, daycare(customer_id)).unwrap().visit;

    let quote = calculate_fee(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: Some("2024-05-01 11:40:00".to_string()),
        },
    )
    .unwrap();
    let closed = check_out(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: Some("2024-05-01 11:40:00".to_string()),
        },
    )
    .unwrap();
    assert_eq!(quote, closed);
    assert_eq!(closed.quote.billed_amount(), 18_000);

    // 두 번째 체크아웃과 요금 계산은 충돌
    let again = CheckoutDto {
        visit_id: visit.id,
        checkout_time: None,
    };
    assert!(matches!(check_out(&state, again.clone()), Err(AppError::Conflict(_))));
    assert!(matches!(calculate_fee(&state, again), Err(AppError::Conflict(_))));

    let history = get_visit_history(&state, HistoryFilter::Date("2024-05-01".to_string())).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].visit.fee, Some(18_000));
    assert_eq!(history[0].visit.duration_minutes, Some(160));
    assert_eq!(get_visit_dates(&state).unwrap(), vec!["2024-05-01"]);
    assert!(get_current_visits(&state).unwrap().is_empty());

    // 체크아웃 후에는 다시 체크인할 수 있다
    assert!(check_in(&state, daycare(customer_id)).is_ok());
}

#[test]
fn test_hoteling_visit_flow_with_prepaid() {
    let fees = crate::features::billing::FeeSchedule {
        hoteling: HotelingRates {
            price_per_day: 50_000,
            price_per_30min: 4_000,
        },
        ..Default::default()
    };
    let state = test_state_with_fees("2024-07-01 10:00:00", fees);
    let customer_id = insert_customer(&state, "보리", None);

    let visit = check_in(
        &state,
        CheckInDto {
            customer_id,
            visit_type: VisitType::Hoteling,
            prepaid: true,
            prepaid_amount: Some(30_000.0),
        },
    )
    .unwrap()
    .visit;

    let result = check_out(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: Some("2024-07-03 10:45:00".to_string()),
        },
    )
    .unwrap();

    match &result.quote {
        FeeQuote::Hoteling(fee) => {
            assert_eq!(fee.full_days, 2);
            assert_eq!(fee.remaining_minutes, 45);
            assert_eq!(fee.overtime_fee, 8_000);
            assert_eq!(fee.total_fee, 108_000);
            assert_eq!(fee.remaining_fee, 78_000);
        }
        other => panic!("호텔링 견적이어야 합니다: {other:?}"),
    }

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["visit_type"], "hoteling");
    assert_eq!(json["total_fee"], 108_000);
    assert_eq!(json["check_out"], "2024-07-03 10:45:00");
}

#[test]
fn test_daycare_without_weight_quotes_zero_with_message() {
    let state = test_state("2024-05-01 09:00:00");
    let customer_id = insert_customer(&state, "콩이", None);
    let visit = check_in(&state, daycare(customer_id)).unwrap().visit;

    let result = check_out(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: Some("2024-05-01 10:00:00".to_string()),
        },
    )
    .unwrap();

    match &result.quote {
        FeeQuote::Daycare(fee) => {
            assert_eq!(fee.fee, 0);
            assert_eq!(
                fee.message.as_deref(),
                Some("몸무게 정보가 없거나 2kg 미만입니다.")
            );
        }
        other => panic!("데이케어 견적이어야 합니다: {other:?}"),
    }
}

#[test]
fn test_deleted_visit_cannot_be_quoted_and_can_be_restored() {
    let state = test_state("2024-05-01 09:00:00");
    let customer_id = insert_customer(&state, "초코", Some(4.0));
    let visit = check_in(&state, daycare(customer_id)).unwrap().visit;

    delete_visit(&state, visit.id).unwrap();

    let quote = calculate_fee(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: None,
        },
    );
    assert!(matches!(quote, Err(AppError::NotFound(_))));

    let deleted = trash::get_deleted_visits(&state).unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].dog_name.as_deref(), Some("초코"));

    trash::restore_visit(&state, visit.id).unwrap();
    assert_eq!(get_current_visits(&state).unwrap().len(), 1);
    assert!(trash::get_deleted_visits(&state).unwrap().is_empty());
}

#[test]
fn test_customer_delete_cascades_through_trash() {
    let state = test_state("2024-05-01 09:00:00");
    let customer_id = insert_customer(&state, "초코", Some(4.0));
    let visit = check_in(&state, daycare(customer_id)).unwrap().visit;

    // 체크인 중에는 삭제할 수 없다
    let blocked = crate::features::customers::delete_customer(&state, customer_id);
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    check_out(
        &state,
        CheckoutDto {
            visit_id: visit.id,
            checkout_time: Some("2024-05-01 10:00:00".to_string()),
        },
    )
    .unwrap();
    crate::features::customers::delete_customer(&state, customer_id).unwrap();

    assert!(get_customer_visits(&state, customer_id).unwrap().is_empty());
    assert_eq!(trash::get_deleted_customers(&state).unwrap().len(), 1);
    assert_eq!(trash::get_deleted_visits(&state).unwrap().len(), 1);

    trash::restore_customer(&state, customer_id).unwrap();
    assert_eq!(get_customer_visits(&state, customer_id).unwrap().len(), 1);
    assert!(trash::get_deleted_customers(&state).unwrap().is_empty());
}

#[test]
fn test_customer_restore_keeps_single_open_visit() {
    let state = test_state("2024-05-01 09:00:00");
    let customer_id = insert_customer(&state, "초코", Some(4.0));

    let first = check_in(&state, daycare(customer_id)).unwrap().visit;
    delete_visit(&state, first.id).unwrap();
    let second = check_in(&state, daycare(customer_id)).unwrap().visit;
    delete_visit(&state, second.id).unwrap();

    crate::features::customers::delete_customer(&state, customer_id).unwrap();
    trash::restore_customer(&state, customer_id).unwrap();

    let open: Vec<i64> = get_current_visits(&state)
        .unwrap()
        .into_iter()
        .filter(|detail| detail.visit.customer_id == customer_id)
        .map(|detail| detail.visit.id)
        .collect();
    assert_eq!(open, vec![second.id]);

    // 남은 방문을 따로 복구하려 해도 한 고객에 이용 중 방문은 하나뿐이다
    let blocked = trash::restore_visit(&state, first.id);
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
}
