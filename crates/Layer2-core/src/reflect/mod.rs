//! Reflect - 타입 메타데이터 모델과 타입 열거
//!
//! - `TypeDescriptor`: 발견된 타입의 불변 메타데이터
//! - `ScanScope`: 디스커버리 범위
//! - `TypeProvider`: 리플렉션 대신 타입을 열거하는 인터페이스
//! - `TypeClassifier`: 멤버 타입 이름 정규화 및 사용자 정의 타입 판별

pub mod classify;
pub mod descriptor;
pub mod provider;
pub mod scope;

pub use classify::{base_type_name, simple_name_of, TypeClassifier};
pub use descriptor::{Annotation, MemberDecl, MemberKind, TypeDescriptor};
pub use provider::{
    BuiltinTypeProvider, ManifestTypeProvider, StaticTypeProvider, TypeIter, TypeProvider,
};
pub use scope::ScanScope;
