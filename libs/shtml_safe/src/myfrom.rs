//! Conversions into `KString` that take static strings without
//! copying.

use kstring::KString;

pub trait MyFrom<T> {
    fn myfrom(s: T) -> Self;
}

impl MyFrom<&'static str> for KString {
    fn myfrom(s: &'static str) -> Self {
        KString::from_static(s)
    }
}

impl MyFrom<String> for KString {
    fn myfrom(s: String) -> Self {
        KString::from_string(s)
    }
}

impl MyFrom<&String> for KString {
    fn myfrom(s: &String) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<KString> for KString {
    fn myfrom(s: KString) -> Self {
        s
    }
}

impl MyFrom<&KString> for KString {
    fn myfrom(s: &KString) -> Self {
        s.clone()
    }
}

pub fn ks<T>(s: T) -> KString
    where KString: MyFrom<T>
{
    KString::myfrom(s)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_ks() {
        let owned = String::from("b");
        assert_eq!(ks("a").as_str(), "a");
        assert_eq!(ks(&owned).as_str(), "b");
        assert_eq!(ks(owned).as_str(), "b");
        assert_eq!(ks(&ks("c")).as_str(), "c");
    }
}
