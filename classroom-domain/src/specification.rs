//! 规约（Specification）模式
//!
//! 将业务规则封装为可复用、可组合、可测试的谓词。权限判定（`access`）
//! 即由若干原子规约组合而成。
//!

/// 规约模式的核心 trait
///
/// 组合子以泛型而非装箱实现，判定对象可以携带借用（例如 `AccessCandidate<'a>`）。
pub trait Specification<T: ?Sized> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约进行 AND 组合
    fn and<S>(self, other: S) -> AndSpecification<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        AndSpecification::new(self, other)
    }

    /// 与另一个规约进行 OR 组合
    fn or<S>(self, other: S) -> OrSpecification<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        OrSpecification::new(self, other)
    }

    /// 对规约取反
    fn not(self) -> NotSpecification<Self>
    where
        Self: Sized,
    {
        NotSpecification::new(self)
    }
}

impl<T: ?Sized> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.as_ref().is_satisfied_by(candidate)
    }
}

/// AND 组合规约（短路求值）
pub struct AndSpecification<L, R> {
    left: L,
    right: R,
}

impl<L, R> AndSpecification<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<T: ?Sized, L, R> Specification<T> for AndSpecification<L, R>
where
    L: Specification<T>,
    R: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// OR 组合规约（短路求值）
pub struct OrSpecification<L, R> {
    left: L,
    right: R,
}

impl<L, R> OrSpecification<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<T: ?Sized, L, R> Specification<T> for OrSpecification<L, R>
where
    L: Specification<T>,
    R: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

/// NOT 规约
pub struct NotSpecification<S> {
    inner: S,
}

impl<S> NotSpecification<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<T: ?Sized, S> Specification<T> for NotSpecification<S>
where
    S: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::User;

    struct IsTeacher;
    impl Specification<User> for IsTeacher {
        fn is_satisfied_by(&self, user: &User) -> bool {
            user.is_teacher()
        }
    }

    struct HasEvenId;
    impl Specification<User> for HasEvenId {
        fn is_satisfied_by(&self, user: &User) -> bool {
            user.id.into_inner() % 2 == 0
        }
    }

    #[test]
    fn and_requires_both() {
        let spec = IsTeacher.and(HasEvenId);
        assert!(spec.is_satisfied_by(&User::teacher(2)));
        assert!(!spec.is_satisfied_by(&User::teacher(3)));
        assert!(!spec.is_satisfied_by(&User::student(2)));
    }

    #[test]
    fn or_requires_either() {
        let spec = IsTeacher.or(HasEvenId);
        assert!(spec.is_satisfied_by(&User::teacher(3)));
        assert!(spec.is_satisfied_by(&User::student(2)));
        assert!(!spec.is_satisfied_by(&User::student(3)));
    }

    #[test]
    fn not_inverts() {
        let spec = IsTeacher.not();
        assert!(spec.is_satisfied_by(&User::student(1)));
        assert!(!spec.is_satisfied_by(&User::teacher(1)));
    }

    #[test]
    fn boxed_specifications_compose() {
        let rules: Vec<Box<dyn Specification<User>>> =
            vec![Box::new(IsTeacher), Box::new(HasEvenId.not())];
        let user = User::teacher(3);
        assert!(rules.iter().all(|r| r.is_satisfied_by(&user)));
    }

    #[test]
    fn nested_combination() {
        // (teacher AND even) OR (NOT teacher)
        let spec = IsTeacher.and(HasEvenId).or(IsTeacher.not());
        assert!(spec.is_satisfied_by(&User::teacher(4)));
        assert!(spec.is_satisfied_by(&User::student(5)));
        assert!(!spec.is_satisfied_by(&User::teacher(5)));
    }
}
