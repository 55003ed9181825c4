//! Alert notification message.
//!
//! The same template is sent with every create and update. Placeholders are
//! resolved by the monitoring service when an alert fires.

/// Notification body attached to every generated monitor.
///
/// Every update resends this text, so it must stay byte-identical to what is
/// deployed (trailing spaces included).
pub const ALERT_MESSAGE: &str = r#"
{{#is_alert}}
- Account명 : {{host.account_name}}
- Region명 : {{host.region}}
- Host명 : {{host.name_tag}}
- 현재 사용량 : {{eval "round(value, 1)"}}
- Alert 임계치 : {{threshold}}
- 알람 발생 시간 : 
  GMT - {{local_time 'last_triggered_at' 'Africa/Abidjan'}}
  {{#is_match "host.region" "ap-northeast-2"}}KIC-{{local_time 'last_triggered_at' 'Asia/Seoul'}}{{/is_match}}{{#is_match "host.region" "us-west-2"}}AIC-{{local_time 'last_triggered_at' 'America/Los_Angeles'}}{{/is_match}}{{#is_match "host.region" "eu-west-1"}}EIC-{{local_time 'last_triggered_at' 'Europe/Dublin'}}{{/is_match}}{{#is_match "host.region" "ruc"}}RUC-{{local_time 'last_triggered_at' 'Europe/Moscow'}}{{/is_match}}{{^is_match "host.region" "ruc" "ap-northeast-2" "us-west-2" "eu-west-1"}}UTC-{{local_time 'last_triggered_at' 'Etc/UTC'}}{{/is_match}}

{{^is_match "host.account_name" ""}}
  @teams-infra_common
{{else}}
  @teams-{{host.account_name}}_all 
{{/is_match}}

{{/is_alert}}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_alert_scoped() {
        let trimmed = ALERT_MESSAGE.trim();
        assert!(trimmed.starts_with("{{#is_alert}}"));
        assert!(trimmed.ends_with("{{/is_alert}}"));
    }

    #[test]
    fn test_message_keeps_deployed_labels() {
        assert!(ALERT_MESSAGE.contains("- 현재 사용량 : {{eval \"round(value, 1)\"}}"));
        assert!(ALERT_MESSAGE.contains("- 알람 발생 시간 : \n"));
        assert!(ALERT_MESSAGE.contains("@teams-{{host.account_name}}_all \n"));
    }

    #[test]
    fn test_message_routes_by_account() {
        assert!(ALERT_MESSAGE.contains("@teams-infra_common"));
        assert!(ALERT_MESSAGE.contains("@teams-{{host.account_name}}_all"));
    }
}
