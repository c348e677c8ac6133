pub const CONFIG_TEMPLATE: &str = r#"{
  // Name used for the organization when nothing has been saved yet
  "siteName": "Your Site",
  // Absolute URL of the site; also the default organization url
  "siteUrl": "https://www.example.com/",
  // @id of the site organization (defaults to <siteUrl>/#organization)
  "organizationId": "https://www.example.com/#organization",
  // Founding year or date shown on the front page organization node
  "foundingDate": "2016",
  // Page slugs that get the full organization schema, like the front page
  "aboutSlugs": ["about"],
  // Content types that accept a manual drop-in schema
  "supportedPostTypes": ["post", "page", "fm_guides", "faqs", "bct_service", "fm_profiles"],
  // Content types whose saves purge the page cache
  "cacheInvalidationPostTypes": ["post", "page", "guide", "faq"],
  // Settings and item metadata, relative to this file
  "storePath": "schema-store.json",
  // Bearer token required by the settings REST routes
  "adminToken": "change-me",
  // Address for `schema-dropin serve`
  "bind": "127.0.0.1:8080"
}"#;
