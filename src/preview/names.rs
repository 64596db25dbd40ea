use std::marker::PhantomData;
use url::Url;

/// A value that can be stored as property content.
pub trait PropertyValue: Sized {
    /// Parses stored content. `base` is the preview URL; relative URLs are
    /// resolved against it.
    fn parse(content: &str, base: &Url) -> Option<Self>;

    fn to_content(&self) -> String;
}

impl PropertyValue for String {
    fn parse(content: &str, _base: &Url) -> Option<Self> {
        Some(content.to_string())
    }

    fn to_content(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_property_value {
    ($($ty:ty),*) => {
        $(
            impl PropertyValue for $ty {
                fn parse(content: &str, _base: &Url) -> Option<Self> {
                    content.trim().parse().ok()
                }

                fn to_content(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_property_value!(i64, u64, u32);

impl PropertyValue for Url {
    fn parse(content: &str, base: &Url) -> Option<Self> {
        base.join(content.trim()).ok()
    }

    fn to_content(&self) -> String {
        self.as_str().to_string()
    }
}

/// A property name bound to the type its content parses as.
#[derive(Debug)]
pub struct PropertyName<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> PropertyName<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for PropertyName<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyName<T> {}

pub const TITLE: PropertyName<String> = PropertyName::new("title");
pub const DESCRIPTION: PropertyName<String> = PropertyName::new("description");
pub const CANONICAL_URL: PropertyName<Url> = PropertyName::new("url");
pub const IMAGE_URL: PropertyName<Url> = PropertyName::new("image");
pub const VIDEO_URL: PropertyName<Url> = PropertyName::new("video");
pub const AUDIO_URL: PropertyName<Url> = PropertyName::new("audio");
pub const FAVICON_URL: PropertyName<Url> = PropertyName::new("icon");
