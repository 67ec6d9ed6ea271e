//! Links.

use crate::{Fields, MEDIA_TYPE_GEOJSON, MEDIA_TYPE_JSON};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Self link.
pub(crate) const SELF_REL: &str = "self";
/// Next (pagination) link.
pub(crate) const NEXT_REL: &str = "next";
/// Root link.
pub(crate) const ROOT_REL: &str = "root";

/// This object describes a relationship with another entity.
///
/// This structure also carries the pagination fields from the [STAC API
/// specification](https://github.com/radiantearth/stac-api-spec/tree/main/item-search#pagination)
/// (`method`, `headers`, `body`, and `merge`), so that a `next` link can be
/// followed without a separate type.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Link {
    /// The actual link in the format of an URL.
    ///
    /// Relative and absolute links are both allowed.
    pub href: String,

    /// Relationship between the current document and the linked document.
    pub rel: String,

    /// Media type of the referenced entity.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// A human readable title to be used in rendered displays of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The HTTP method of the request, usually GET or POST. Defaults to GET.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// A dictionary of header values that must be included in the next request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,

    /// A JSON object containing fields/values that must be included in the body
    /// of the next request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,

    /// If true, the headers/body fields in the next link must be merged into
    /// the original request and be sent combined in the next request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,

    /// Additional fields on the link.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Implemented by any object that has links.
pub trait Links {
    /// Returns a reference to this object's links.
    fn links(&self) -> &[Link];

    /// Returns a mutable reference to this object's links.
    fn links_mut(&mut self) -> &mut Vec<Link>;

    /// Returns the first link with the given rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Link, Links};
    ///
    /// let mut item = Item::new("an-id");
    /// item.links.push(Link::new("./catalog.json", "root"));
    /// assert_eq!(item.link("root").unwrap().href, "./catalog.json");
    /// ```
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|link| link.rel == rel)
    }

    /// Sets a link of the given rel type.
    ///
    /// This will remove all other links of that rel type, so should only be
    /// used for e.g. "root", not e.g. "child".
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::{Item, Link, Links};
    ///
    /// let mut item = Item::new("an-id");
    /// item.set_link(Link::new("a/href", "root"));
    /// item.set_link(Link::new("b/href", "root"));
    /// assert_eq!(item.links.len(), 1);
    /// ```
    fn set_link(&mut self, link: Link) {
        self.links_mut().retain(|l| l.rel != link.rel);
        self.links_mut().push(link)
    }

    /// Returns this object's self link.
    fn self_link(&self) -> Option<&Link> {
        self.link(SELF_REL)
    }

    /// Returns the `next` link, if there is one.
    fn next_link(&self) -> Option<&Link> {
        self.link(NEXT_REL)
    }
}

impl Link {
    /// Creates a new link with the provided href and rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Link;
    ///
    /// let link = Link::new("an-href", "a-rel");
    /// assert_eq!(link.href, "an-href");
    /// assert_eq!(link.rel, "a-rel");
    /// ```
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
            method: None,
            headers: None,
            body: None,
            merge: None,
            additional_fields: Map::new(),
        }
    }

    /// Sets this link's media type to JSON.
    pub fn json(mut self) -> Link {
        self.r#type = Some(MEDIA_TYPE_JSON.to_string());
        self
    }

    /// Sets this link's media type to GeoJSON.
    pub fn geojson(mut self) -> Link {
        self.r#type = Some(MEDIA_TYPE_GEOJSON.to_string());
        self
    }

    /// Returns true if this link's rel is `self`.
    pub fn is_self(&self) -> bool {
        self.rel == SELF_REL
    }

    /// Returns true if this link asks for a POST.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Link;
    ///
    /// let mut link = Link::new("http://stac.test/search", "next");
    /// assert!(!link.is_post());
    /// link.method = Some("post".to_string());
    /// assert!(link.is_post());
    /// ```
    pub fn is_post(&self) -> bool {
        self.method
            .as_deref()
            .is_some_and(|method| method.eq_ignore_ascii_case("POST"))
    }
}

impl Fields for Link {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }

    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

#[cfg(test)]
mod tests {
    use super::Link;
    use serde_json::json;

    #[test]
    fn pagination_fields() {
        let link: Link = serde_json::from_value(json!({
            "href": "http://stac.test/search",
            "rel": "next",
            "method": "POST",
            "body": {"token": "abc"},
            "merge": true,
            "foo": "bar"
        }))
        .unwrap();
        assert!(link.is_post());
        assert_eq!(link.body.as_ref().unwrap()["token"], "abc");
        assert_eq!(link.merge, Some(true));
        assert_eq!(link.additional_fields["foo"], "bar");
    }

    #[test]
    fn skip_empty() {
        let value = serde_json::to_value(Link::new("a", "b")).unwrap();
        assert_eq!(value, json!({"href": "a", "rel": "b"}));
    }
}
