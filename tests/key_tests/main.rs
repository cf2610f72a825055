//! Key tests: the IndexedDB comparator and the record classifier.
