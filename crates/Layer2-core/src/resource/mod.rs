//! Resource Resolution - 논리적 리소스 참조 해석
//!
//! `pkg:`, `builtin:`, `file:`, http(s), bare name 참조를 구체적인 위치로
//! 해석하고 TTL 캐시를 거쳐 내용을 로드합니다.

mod locator;
mod resolver;
mod scheme;

pub use locator::{split_scheme, Locator, Scheme};
pub use resolver::ResourceResolver;
pub use scheme::{BuiltinResolver, FileResolver, HttpResolver, PackageResolver, SchemeResolver};
