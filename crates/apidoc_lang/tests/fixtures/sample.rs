// SPDX-License-Identifier: MIT

/// @api GET /users
///   list users
const char *s = "/* not a comment */";

/*
 * @apidoc
 *   line1
 *   line2
 */
x = 1; // ok
