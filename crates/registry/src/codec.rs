// Copyright (C) 2024-present The Pathwire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::RegistryError;
use std::{collections::HashMap, fmt, hash::Hash};

/// One sub-registry: parsers keyed by the on-wire type code `C`, serializers
/// keyed by the variant tag `T` of the value being written.
///
/// `P` and `S` are expected to be plain `fn` pointers, which keeps a populated
/// registry `Send + Sync` and cheap to look up.
#[derive(Clone)]
pub struct CodecRegistry<C, T, P, S> {
    namespace: &'static str,
    parsers: HashMap<C, P>,
    serializers: HashMap<T, S>,
}

/// Handle returned by [CodecRegistry::register_parser]
#[derive(Debug, PartialEq, Eq)]
pub struct ParserRegistration<C> {
    namespace: &'static str,
    code: C,
}

/// Handle returned by [CodecRegistry::register_serializer]
#[derive(Debug, PartialEq, Eq)]
pub struct SerializerRegistration<T> {
    namespace: &'static str,
    tag: T,
}

impl<C: Copy> ParserRegistration<C> {
    pub const fn code(&self) -> C {
        self.code
    }
}

impl<T: Copy> SerializerRegistration<T> {
    pub const fn tag(&self) -> T {
        self.tag
    }
}

impl<C, T, P, S> CodecRegistry<C, T, P, S>
where
    C: Copy + Eq + Hash + fmt::Debug,
    T: Copy + Eq + Hash + fmt::Debug,
    P: Copy,
    S: Copy,
{
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            parsers: HashMap::new(),
            serializers: HashMap::new(),
        }
    }

    pub const fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Bind `parser` to `code`. There's no override: binding a code twice is
    /// an error.
    pub fn register_parser(
        &mut self,
        code: C,
        parser: P,
    ) -> Result<ParserRegistration<C>, RegistryError> {
        if self.parsers.contains_key(&code) {
            return Err(RegistryError::duplicate(self.namespace, code));
        }
        self.parsers.insert(code, parser);
        Ok(ParserRegistration {
            namespace: self.namespace,
            code,
        })
    }

    pub fn register_serializer(
        &mut self,
        tag: T,
        serializer: S,
    ) -> Result<SerializerRegistration<T>, RegistryError> {
        if self.serializers.contains_key(&tag) {
            return Err(RegistryError::duplicate(self.namespace, tag));
        }
        self.serializers.insert(tag, serializer);
        Ok(SerializerRegistration {
            namespace: self.namespace,
            tag,
        })
    }

    #[inline]
    pub fn parser(&self, code: &C) -> Option<P> {
        self.parsers.get(code).copied()
    }

    #[inline]
    pub fn serializer(&self, tag: &T) -> Option<S> {
        self.serializers.get(tag).copied()
    }

    pub fn release_parser(&mut self, registration: ParserRegistration<C>) -> bool {
        registration.namespace == self.namespace
            && self.parsers.remove(&registration.code).is_some()
    }

    pub fn release_serializer(&mut self, registration: SerializerRegistration<T>) -> bool {
        registration.namespace == self.namespace
            && self.serializers.remove(&registration.tag).is_some()
    }

    pub fn parser_codes(&self) -> impl Iterator<Item = &C> {
        self.parsers.keys()
    }

    pub fn serializer_tags(&self) -> impl Iterator<Item = &T> {
        self.serializers.keys()
    }
}

impl<C: fmt::Debug, T: fmt::Debug, P, S> fmt::Debug for CodecRegistry<C, T, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("namespace", &self.namespace)
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .field("serializers", &self.serializers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Parser = fn(&[u8]) -> Option<u32>;
    type Serializer = fn(u32) -> Vec<u8>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Tag {
        Small,
        Large,
    }

    fn parse_small(buf: &[u8]) -> Option<u32> {
        buf.first().map(|x| *x as u32)
    }

    fn parse_large(buf: &[u8]) -> Option<u32> {
        buf.get(..4)
            .map(|x| u32::from_be_bytes([x[0], x[1], x[2], x[3]]))
    }

    fn write_small(value: u32) -> Vec<u8> {
        vec![value as u8]
    }

    fn registry() -> CodecRegistry<u8, Tag, Parser, Serializer> {
        CodecRegistry::new("test-objects")
    }

    #[test]
    fn test_duplicate_parser() {
        let mut registry = registry();
        registry.register_parser(1, parse_small).unwrap();
        let ret = registry.register_parser(1, parse_large);
        assert_eq!(
            ret,
            Err(RegistryError::DuplicateRegistration {
                namespace: "test-objects".to_string(),
                key: "1".to_string(),
            })
        );
        // The first binding survives
        let parser = registry.parser(&1).unwrap();
        assert_eq!(parser(&[7, 0, 0, 0]), Some(7));
    }

    #[test]
    fn test_distinct_codes_independently_retrievable() {
        let mut registry = registry();
        registry.register_parser(1, parse_small).unwrap();
        registry.register_parser(2, parse_large).unwrap();
        registry.register_serializer(Tag::Small, write_small).unwrap();

        let small = registry.parser(&1).unwrap();
        let large = registry.parser(&2).unwrap();
        assert_eq!(small(&[0, 0, 1, 0]), Some(0));
        assert_eq!(large(&[0, 0, 1, 0]), Some(256));
        assert!(registry.parser(&3).is_none());

        let serializer = registry.serializer(&Tag::Small).unwrap();
        assert_eq!(serializer(5), vec![5]);
        assert!(registry.serializer(&Tag::Large).is_none());
    }

    #[test]
    fn test_release_single_mapping() {
        let mut registry = registry();
        let first = registry.register_parser(1, parse_small).unwrap();
        registry.register_parser(2, parse_large).unwrap();
        let serializer = registry.register_serializer(Tag::Small, write_small).unwrap();

        assert_eq!(first.code(), 1);
        assert!(registry.release_parser(first));
        assert!(registry.parser(&1).is_none());
        assert!(registry.parser(&2).is_some());

        assert!(registry.release_serializer(serializer));
        assert!(registry.serializer(&Tag::Small).is_none());
    }

    #[test]
    fn test_release_from_other_namespace() {
        let mut registry = registry();
        let mut other: CodecRegistry<u8, Tag, Parser, Serializer> = CodecRegistry::new("other");
        registry.register_parser(1, parse_small).unwrap();
        let foreign = other.register_parser(1, parse_small).unwrap();
        assert!(!registry.release_parser(foreign));
        assert!(registry.parser(&1).is_some());
    }
}
