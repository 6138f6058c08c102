use crate::features::billing::models::{AdditionalUnit, DaycareFee, HotelingFee};
use crate::features::billing::schedule::{FeeSchedule, HotelingRates};
use crate::shared::errors::AppResult;
use crate::shared::utils::{parse_civil_timestamp, Clock};
use chrono::NaiveDateTime;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1_440;
const HALF_HOUR: i64 = 30;

/// 이용 시간 (분) 을 계산한다
///
/// # 인자
/// * `check_in` - 체크인 시각 (KST 현지 시각 문자열)
/// * `check_out` - 체크아웃 시각. 없으면 시계의 현재 시각
/// * `clock` - 현재 시각 공급자
///
/// # 반환값
/// 경과 분 (소수점 이하 버림, 0 미만이면 0). 시각 형식이 틀리면 검증 에러
pub fn compute_duration_minutes(
    check_in: &str,
    check_out: Option<&str>,
    clock: &dyn Clock,
) -> AppResult<i64> {
    let start = parse_civil_timestamp(check_in)?;
    let end = match check_out {
        Some(value) => parse_civil_timestamp(value)?,
        None => clock.now_civil(),
    };

    Ok(minutes_between(start, end))
}

/// 두 현지 시각 사이의 경과 분 (버림, 0 이상)
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let seconds = (end - start).num_seconds();
    // 음수 나눗셈은 0 쪽으로 잘리므로 먼저 0으로 맞춘다
    seconds.max(0) / 60
}

/// 데이케어 요금을 계산한다
///
/// # 인자
/// * `schedule` - 요금표
/// * `weight` - 반려견 몸무게 (kg)
/// * `duration_minutes` - 이용 시간 (분)
///
/// # 반환값
/// 요금 계산 결과. 몸무게가 없거나 어느 구간에도 속하지 않으면 0원과 안내 문구
///
/// # 계산 규칙
/// - 1시간 단위 요금 + 잔여 시간 요금
/// - 잔여 30분 미만은 30분 요금, 30분 이상은 1시간 요금
pub fn compute_daycare_fee(
    schedule: &FeeSchedule,
    weight: Option<f64>,
    duration_minutes: i64,
) -> DaycareFee {
    let duration_minutes = duration_minutes.max(0);

    let Some(band) = weight.and_then(|w| schedule.band_for(w)) else {
        return DaycareFee {
            fee: 0,
            message: Some(unpriced_weight_message(schedule, weight)),
            full_hours: 0,
            remaining_minutes: 0,
            additional_fee: 0,
            additional_unit: AdditionalUnit::None,
            price_per_hour: 0,
            price_per_30min: 0,
            duration_minutes,
            weight,
        };
    };

    let full_hours = duration_minutes / MINUTES_PER_HOUR;
    let remaining_minutes = duration_minutes % MINUTES_PER_HOUR;

    let (additional_fee, additional_unit) = match remaining_minutes {
        0 => (0, AdditionalUnit::None),
        r if r < HALF_HOUR => (band.half_hour_rate, AdditionalUnit::HalfHour),
        _ => (band.hourly_rate, AdditionalUnit::Hour),
    };

    DaycareFee {
        fee: full_hours * band.hourly_rate + additional_fee,
        message: None,
        full_hours,
        remaining_minutes,
        additional_fee,
        additional_unit,
        price_per_hour: band.hourly_rate,
        price_per_30min: band.half_hour_rate,
        duration_minutes,
        weight,
    }
}

/// 요금 구간을 찾지 못했을 때의 안내 문구
fn unpriced_weight_message(schedule: &FeeSchedule, weight: Option<f64>) -> String {
    let minimum_weight = schedule.minimum_weight();
    match weight {
        Some(w) if w.is_finite() && w >= minimum_weight => {
            format!("{w}kg에 해당하는 요금 구간이 없습니다. 요금 설정을 확인해주세요.")
        }
        _ => format!("몸무게 정보가 없거나 {minimum_weight}kg 미만입니다."),
    }
}

/// 호텔링 요금을 계산한다
///
/// # 인자
/// * `rates` - 호텔링 요금
/// * `duration_minutes` - 이용 시간 (분)
/// * `prepaid_amount` - 선결제 금액
///
/// # 반환값
/// 요금 계산 결과. 잔액은 음수일 수 있다
///
/// # 계산 규칙
/// - 1일 (1440분) 단위 요금 + 잔여 시간 30분 단위 올림 요금
pub fn compute_hoteling_fee(
    rates: &HotelingRates,
    duration_minutes: i64,
    prepaid_amount: i64,
) -> HotelingFee {
    let duration_minutes = duration_minutes.max(0);

    let full_days = duration_minutes / MINUTES_PER_DAY;
    let remaining_minutes = duration_minutes % MINUTES_PER_DAY;
    let overtime_units = (remaining_minutes + HALF_HOUR - 1) / HALF_HOUR;
    let overtime_fee = overtime_units * rates.price_per_30min;
    let total_fee = full_days * rates.price_per_day + overtime_fee;

    HotelingFee {
        total_fee,
        full_days,
        remaining_minutes,
        overtime_fee,
        price_per_day: rates.price_per_day,
        price_per_30min: rates.price_per_30min,
        prepaid_amount,
        remaining_fee: total_fee - prepaid_amount,
        duration_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::billing::schedule::RateBand;
    use crate::shared::utils::FixedClock;
    use quickcheck_macros::quickcheck;

    fn schedule() -> FeeSchedule {
        FeeSchedule::default()
    }

    #[test]
    fn test_duration_with_explicit_checkout() {
        let clock = FixedClock::from_civil("2030-01-01 00:00:00").unwrap();

        let minutes =
            compute_duration_minutes("2024-01-01 09:00:00", Some("2024-01-01 11:40:00"), &clock)
                .unwrap();
        assert_eq!(minutes, 160);

        // 59초는 버린다
        let minutes =
            compute_duration_minutes("2024-01-01 09:00:00", Some("2024-01-01 09:01:59"), &clock)
                .unwrap();
        assert_eq!(minutes, 1);
    }

    #[test]
    fn test_duration_uses_clock_when_checkout_missing() {
        let clock = FixedClock::from_civil("2024-01-01 10:15:30").unwrap();

        let minutes = compute_duration_minutes("2024-01-01 09:00:00", None, &clock).unwrap();
        assert_eq!(minutes, 75);
    }

    #[test]
    fn test_duration_clamps_future_check_in_to_zero() {
        let clock = FixedClock::from_civil("2024-01-01 09:00:00").unwrap();

        let minutes = compute_duration_minutes("2024-01-01 12:00:00", None, &clock).unwrap();
        assert_eq!(minutes, 0);
    }

    #[test]
    fn test_duration_rejects_malformed_timestamp() {
        let clock = FixedClock::from_civil("2024-01-01 09:00:00").unwrap();

        assert!(compute_duration_minutes("어제", None, &clock).is_err());
        assert!(compute_duration_minutes("2024-01-01 09:00:00", Some("곧"), &clock).is_err());
    }

    #[test]
    fn test_daycare_missing_or_light_weight() {
        for weight in [None, Some(1.9), Some(0.0), Some(f64::NAN)] {
            let result = compute_daycare_fee(&schedule(), weight, 120);
            assert_eq!(result.fee, 0);
            assert_eq!(
                result.message.as_deref(),
                Some("몸무게 정보가 없거나 2kg 미만입니다.")
            );
            assert_eq!(result.additional_unit, AdditionalUnit::None);
        }
    }

    #[test]
    fn test_daycare_weight_between_configured_bands() {
        let schedule = FeeSchedule {
            daycare_bands: vec![
                RateBand {
                    min_weight: 2.0,
                    max_weight: Some(5.0),
                    hourly_rate: 5_000,
                    half_hour_rate: 2_500,
                },
                RateBand {
                    min_weight: 10.0,
                    max_weight: None,
                    hourly_rate: 7_000,
                    half_hour_rate: 3_500,
                },
            ],
            hoteling: HotelingRates::default(),
        };

        let result = compute_daycare_fee(&schedule, Some(7.5), 120);
        assert_eq!(result.fee, 0);
        assert_eq!(
            result.message.as_deref(),
            Some("7.5kg에 해당하는 요금 구간이 없습니다. 요금 설정을 확인해주세요.")
        );

        // 첫 구간 하한 미만은 기존 안내 문구
        let light = compute_daycare_fee(&schedule, Some(1.0), 120);
        assert_eq!(
            light.message.as_deref(),
            Some("몸무게 정보가 없거나 2kg 미만입니다.")
        );
    }

    #[test]
    fn test_daycare_exact_hours_have_no_additional_fee() {
        let result = compute_daycare_fee(&schedule(), Some(5.0), 120);

        assert_eq!(result.fee, 10_000);
        assert_eq!(result.full_hours, 2);
        assert_eq!(result.remaining_minutes, 0);
        assert_eq!(result.additional_fee, 0);
        assert_eq!(result.additional_unit, AdditionalUnit::None);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_daycare_half_hour_boundary_at_seven_kilograms() {
        // 7kg은 첫 번째 구간 (5,000 / 2,500)
        let at_90 = compute_daycare_fee(&schedule(), Some(7.0), 90);
        assert_eq!(at_90.fee, 10_000);
        assert_eq!(at_90.additional_unit, AdditionalUnit::Hour);

        let at_89 = compute_daycare_fee(&schedule(), Some(7.0), 89);
        assert_eq!(at_89.fee, 7_500);
        assert_eq!(at_89.additional_unit, AdditionalUnit::HalfHour);
        assert_eq!(at_89.additional_fee, 2_500);
    }

    #[test]
    fn test_daycare_short_visit_charges_half_hour() {
        let result = compute_daycare_fee(&schedule(), Some(20.0), 1);
        assert_eq!(result.fee, 3_500);
        assert_eq!(result.full_hours, 0);
        assert_eq!(result.remaining_minutes, 1);

        let zero = compute_daycare_fee(&schedule(), Some(20.0), 0);
        assert_eq!(zero.fee, 0);
        assert!(zero.message.is_none());
    }

    #[test]
    fn test_daycare_scenario_ten_kilograms() {
        // 09:00 체크인, 11:40 체크아웃, 10kg
        let clock = FixedClock::from_civil("2024-05-01 11:40:00").unwrap();
        let minutes = compute_duration_minutes("2024-05-01 09:00:00", None, &clock).unwrap();
        let result = compute_daycare_fee(&schedule(), Some(10.0), minutes);

        assert_eq!(minutes, 160);
        assert_eq!(result.full_hours, 2);
        assert_eq!(result.remaining_minutes, 40);
        assert_eq!(result.additional_unit, AdditionalUnit::Hour);
        assert_eq!(result.price_per_hour, 6_000);
        assert_eq!(result.fee, 18_000);
    }

    #[test]
    fn test_hoteling_one_minute_overtime_rounds_up() {
        let rates = HotelingRates::default();

        let result = compute_hoteling_fee(&rates, 1_441, 0);
        assert_eq!(result.full_days, 1);
        assert_eq!(result.remaining_minutes, 1);
        assert_eq!(result.overtime_fee, 4_000);
        assert_eq!(result.total_fee, 54_000);

        let exact = compute_hoteling_fee(&rates, 1_440, 0);
        assert_eq!(exact.overtime_fee, 0);
        assert_eq!(exact.total_fee, 50_000);
    }

    #[test]
    fn test_hoteling_overpayment_is_not_clamped() {
        let result = compute_hoteling_fee(&HotelingRates::default(), 1_440, 80_000);
        assert_eq!(result.remaining_fee, -30_000);
    }

    #[test]
    fn test_hoteling_scenario_two_days_and_forty_five_minutes() {
        let rates = HotelingRates {
            price_per_day: 50_000,
            price_per_30min: 4_000,
        };
        let clock = FixedClock::from_civil("2030-01-01 00:00:00").unwrap();
        let minutes =
            compute_duration_minutes("2024-07-01 10:00:00", Some("2024-07-03 10:45:00"), &clock)
                .unwrap();

        let result = compute_hoteling_fee(&rates, minutes, 30_000);

        assert_eq!(minutes, 2 * 1_440 + 45);
        assert_eq!(result.full_days, 2);
        assert_eq!(result.remaining_minutes, 45);
        assert_eq!(result.overtime_fee, 8_000);
        assert_eq!(result.total_fee, 108_000);
        assert_eq!(result.remaining_fee, 78_000);
    }

    #[test]
    fn test_additional_unit_serialization() {
        let result = compute_daycare_fee(&schedule(), Some(3.0), 70);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["additional_unit"], "30분");
        assert_eq!(json["fee"], 7_500);
        assert!(json.get("message").is_none());
    }

    #[quickcheck]
    fn prop_duration_is_never_negative(offset_seconds: i32) -> bool {
        let clock = FixedClock::from_civil("2024-01-01 12:00:00").unwrap();
        let start = clock.now_civil() + chrono::Duration::seconds(i64::from(offset_seconds));
        minutes_between(start, clock.now_civil()) >= 0
    }

    #[quickcheck]
    fn prop_daycare_fee_decomposes(minutes: u16, weight_tenths: u16) -> bool {
        let weight = 2.0 + f64::from(weight_tenths % 400) / 10.0;
        let duration = i64::from(minutes);
        let result = compute_daycare_fee(&schedule(), Some(weight), duration);

        result.fee == result.full_hours * result.price_per_hour + result.additional_fee
            && result.full_hours * 60 + result.remaining_minutes == duration
            && result.fee >= 0
    }

    #[quickcheck]
    fn prop_daycare_fee_is_monotonic_in_duration(minutes: u16, weight_tenths: u16) -> bool {
        let weight = Some(2.0 + f64::from(weight_tenths % 400) / 10.0);
        let shorter = compute_daycare_fee(&schedule(), weight, i64::from(minutes));
        let longer = compute_daycare_fee(&schedule(), weight, i64::from(minutes) + 1);
        longer.fee >= shorter.fee
    }

    #[quickcheck]
    fn prop_hoteling_totals_are_consistent(minutes: u32, prepaid: u32) -> bool {
        let duration = i64::from(minutes);
        let prepaid = i64::from(prepaid);
        let rates = HotelingRates::default();
        let result = compute_hoteling_fee(&rates, duration, prepaid);

        let overtime_ok = result.overtime_fee >= 0
            && result.overtime_fee < 48 * rates.price_per_30min + rates.price_per_30min;
        result.total_fee == result.full_days * rates.price_per_day + result.overtime_fee
            && result.remaining_fee == result.total_fee - prepaid
            && result.full_days * 1_440 + result.remaining_minutes == duration
            && overtime_ok
    }

    #[quickcheck]
    fn prop_daycare_without_priced_weight_is_free(minutes: u32, has_weight: bool) -> bool {
        let weight = if has_weight { Some(1.9) } else { None };
        let result = compute_daycare_fee(&schedule(), weight, i64::from(minutes));

        result.fee == 0
            && result.message.as_deref() == Some("몸무게 정보가 없거나 2kg 미만입니다.")
    }

    #[quickcheck]
    fn prop_daycare_fee_is_deterministic(minutes: u32, weight_tenths: u16) -> bool {
        let weight = Some(f64::from(weight_tenths % 500) / 10.0);
        let duration = i64::from(minutes);

        compute_daycare_fee(&schedule(), weight, duration)
            == compute_daycare_fee(&schedule(), weight, duration)
    }

    #[quickcheck]
    fn prop_hoteling_fee_is_deterministic(minutes: u32, prepaid: u32) -> bool {
        let rates = HotelingRates::default();
        let duration = i64::from(minutes);
        let prepaid = i64::from(prepaid);

        compute_hoteling_fee(&rates, duration, prepaid)
            == compute_hoteling_fee(&rates, duration, prepaid)
    }
}
