//! Name Matcher - 발견된 후보 중 요청 이름과 일치하는 타입 선택
//!
//! 우선순위: simple name 정확 일치, qualified name 또는 qualified suffix,
//! 그 다음 (fuzzy 모드에서만) 대소문자 무시 일치와 대소문자 무시 부분 문자열.

use crate::reflect::TypeDescriptor;
use tracing::debug;

/// 후보가 매칭된 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Qualified,
    CaseInsensitive,
    Substring,
}

impl MatchKind {
    pub fn is_fuzzy(&self) -> bool {
        matches!(self, Self::CaseInsensitive | Self::Substring)
    }
}

/// 요청 이름 하나에 대한 매칭 결과
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Found {
        descriptor: TypeDescriptor,
        kind: MatchKind,
    },
    /// fuzzy 후보 여러 개 (프로바이더 순서의 qualified name)
    Ambiguous(Vec<String>),
    NotFound,
}

/// `candidates` (프로바이더 순서) 에서 `name` 매칭
pub fn find_match<I>(candidates: I, name: &str, fuzzy: bool) -> MatchOutcome
where
    I: IntoIterator<Item = TypeDescriptor>,
{
    let candidates: Vec<TypeDescriptor> = candidates.into_iter().collect();

    let exact: Vec<usize> = positions(&candidates, |c| c.simple_name() == name);
    if let Some(&first) = exact.first() {
        if exact.len() > 1 {
            debug!(
                "Duplicate simple name '{}' ({} candidates), using {}",
                name,
                exact.len(),
                candidates[first].qualified_name()
            );
        }
        return found(candidates, first, MatchKind::Exact);
    }

    let suffix = format!(".{}", name);
    let qualified = positions(&candidates, |c| {
        c.qualified_name() == name || c.qualified_name().ends_with(&suffix)
    });
    if let Some(&first) = qualified.first() {
        return found(candidates, first, MatchKind::Qualified);
    }

    if !fuzzy {
        return MatchOutcome::NotFound;
    }

    let lower = name.to_lowercase();
    let case_insensitive = positions(&candidates, |c| c.simple_name().to_lowercase() == lower);
    if let Some(outcome) = pick(&candidates, &case_insensitive) {
        return finish(candidates, outcome, MatchKind::CaseInsensitive);
    }

    let substring = positions(&candidates, |c| {
        c.simple_name().to_lowercase().contains(&lower)
    });
    match pick(&candidates, &substring) {
        Some(outcome) => finish(candidates, outcome, MatchKind::Substring),
        None => MatchOutcome::NotFound,
    }
}

enum Pick {
    One(usize),
    Many(Vec<String>),
}

fn positions(candidates: &[TypeDescriptor], pred: impl Fn(&TypeDescriptor) -> bool) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| pred(c))
        .map(|(i, _)| i)
        .collect()
}

fn pick(candidates: &[TypeDescriptor], indices: &[usize]) -> Option<Pick> {
    match indices {
        [] => None,
        [one] => Some(Pick::One(*one)),
        many => Some(Pick::Many(
            many.iter()
                .map(|&i| candidates[i].qualified_name().to_string())
                .collect(),
        )),
    }
}

fn finish(candidates: Vec<TypeDescriptor>, pick: Pick, kind: MatchKind) -> MatchOutcome {
    match pick {
        Pick::One(index) => found(candidates, index, kind),
        Pick::Many(names) => MatchOutcome::Ambiguous(names),
    }
}

fn found(mut candidates: Vec<TypeDescriptor>, index: usize, kind: MatchKind) -> MatchOutcome {
    MatchOutcome::Found {
        descriptor: candidates.swap_remove(index),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new("app.services.OrderService"),
            TypeDescriptor::new("app.services.PaymentGateway"),
            TypeDescriptor::new("app.repo.OrderRepository"),
        ]
    }

    fn matched_name(outcome: MatchOutcome) -> Option<(String, MatchKind)> {
        match outcome {
            MatchOutcome::Found { descriptor, kind } => {
                Some((descriptor.qualified_name().to_string(), kind))
            }
            _ => None,
        }
    }

    #[test]
    fn test_exact_first_in_order() {
        let mut list = candidates();
        list.push(TypeDescriptor::new("other.OrderService"));
        let (name, kind) = matched_name(find_match(list, "OrderService", false)).unwrap();
        assert_eq!(name, "app.services.OrderService");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn test_qualified_suffix() {
        let (name, kind) =
            matched_name(find_match(candidates(), "services.PaymentGateway", false)).unwrap();
        assert_eq!(name, "app.services.PaymentGateway");
        assert_eq!(kind, MatchKind::Qualified);

        let (name, _) =
            matched_name(find_match(candidates(), "app.repo.OrderRepository", false)).unwrap();
        assert_eq!(name, "app.repo.OrderRepository");
    }

    #[test]
    fn test_suffix_requires_segment_boundary() {
        assert_eq!(
            find_match(candidates(), "Gateway", false),
            MatchOutcome::NotFound
        );
    }

    #[test]
    fn test_fuzzy_disabled_outside_dev_mode() {
        assert_eq!(
            find_match(candidates(), "orderservice", false),
            MatchOutcome::NotFound
        );
    }

    #[test]
    fn test_fuzzy_case_insensitive() {
        let (name, kind) = matched_name(find_match(candidates(), "orderservice", true)).unwrap();
        assert_eq!(name, "app.services.OrderService");
        assert_eq!(kind, MatchKind::CaseInsensitive);
        assert!(kind.is_fuzzy());
    }

    #[test]
    fn test_fuzzy_substring_unique() {
        let (name, kind) = matched_name(find_match(candidates(), "gateway", true)).unwrap();
        assert_eq!(name, "app.services.PaymentGateway");
        assert_eq!(kind, MatchKind::Substring);
    }

    #[test]
    fn test_fuzzy_ambiguous() {
        match find_match(candidates(), "order", true) {
            MatchOutcome::Ambiguous(names) => assert_eq!(
                names,
                vec!["app.services.OrderService", "app.repo.OrderRepository"]
            ),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }
}
