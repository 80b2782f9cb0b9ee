//! Type Descriptor - 발견된 컴포넌트 타입의 불변 메타데이터

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Annotation
// ============================================================================

/// 타입에 붙은 어노테이션 (태그 + 값)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// 어노테이션 태그 (예: "Service", "Controller")
    tag: String,

    /// 첨부된 값
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    values: BTreeMap<String, Value>,
}

impl Annotation {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            values: BTreeMap::new(),
        }
    }

    /// 값 추가
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

// ============================================================================
// MemberDecl
// ============================================================================

/// 멤버 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// 필드 (선언 타입)
    Field,
    /// 메서드 (반환 타입)
    Method,
}

/// 선언된 멤버
///
/// `type_name` 이 없으면 분석 불가능한 멤버로 취급되어 의존성 분석에서 건너뜁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDecl {
    name: String,
    kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
}

impl MemberDecl {
    /// 필드 선언
    pub fn field(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            type_name: Some(type_name.into()),
        }
    }

    /// 메서드 선언 (반환 타입)
    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            type_name: Some(return_type.into()),
        }
    }

    /// 타입 정보가 없는 멤버
    pub fn opaque(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// 타입 디스크립터
///
/// 생성 이후에는 변경되지 않습니다. hot reload 는 기존 디스크립터를 수정하지 않고
/// 새 디스크립터로 캐시 항목을 교체합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// 단순 이름 (비어있으면 qualified_name 의 마지막 세그먼트)
    #[serde(default)]
    simple_name: String,

    /// 모듈/패키지 포함 이름 (점 구분)
    qualified_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<Annotation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    supertype: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    members: Vec<MemberDecl>,
}

impl TypeDescriptor {
    /// qualified name 으로 생성 (simple name 은 마지막 세그먼트)
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = last_segment(&qualified_name).to_string();
        Self {
            simple_name,
            qualified_name,
            annotations: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    /// simple name 이 qualified name 과 다를 때
    pub fn with_simple_name(mut self, simple_name: impl Into<String>) -> Self {
        self.simple_name = simple_name.into();
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 값 없는 어노테이션 추가
    pub fn annotated(self, tag: impl Into<String>) -> Self {
        self.with_annotation(Annotation::new(tag))
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.with_member(MemberDecl::field(name, type_name))
    }

    pub fn with_method(self, name: impl Into<String>, return_type: impl Into<String>) -> Self {
        self.with_member(MemberDecl::method(name, return_type))
    }

    /// 역직렬화 후 비어있는 simple name 채우기
    pub(crate) fn normalized(mut self) -> Self {
        if self.simple_name.is_empty() {
            self.simple_name = last_segment(&self.qualified_name).to_string();
        }
        self
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// 패키지 부분 (`app.services.OrderService` -> `app.services`)
    pub fn package(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map(|(pkg, _)| pkg)
            .unwrap_or("")
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, tag: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.tag == tag)
    }

    pub fn has_annotation(&self, tag: &str) -> bool {
        self.annotation(tag).is_some()
    }

    pub fn supertype(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn members(&self) -> &[MemberDecl] {
        &self.members
    }
}

/// 점 구분 이름의 마지막 세그먼트
fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
